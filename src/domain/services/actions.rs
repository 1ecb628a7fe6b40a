#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::AuthenticatorBox;
use crate::domain::models::CompletionBox;
use crate::domain::models::CompletionPrompt;
use crate::domain::models::Credentials;
use crate::domain::models::Event;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /logout (/l) - Log out and clear the conversation.
- /reset (/r) - Clear the whole session, including who is logged in.
- /quit /exit (/q) - Exit Chatterbox.
- /help (/h) - Provides this help menu.

HOTKEYS:
- Tab - Switch between the email and password fields on the login screen.
- Enter - Log in, or send your message.
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+L - Log out.
- CTRL+R - Reset the session. Works on every screen, even while waiting for a reply.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

async fn login(
    auth: &AuthenticatorBox,
    credentials: Credentials,
    generation: u64,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let res = auth.sign_in(&credentials).await;
    if let Err(err) = &res {
        tracing::warn!(email = %credentials.email, error = ?err, "Login failed");
    }

    tx.send(Event::LoginResponse(generation, res))?;
    return Ok(());
}

async fn completion(
    backend: &CompletionBox,
    prompt: CompletionPrompt,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let reply = backend.query(&prompt).await;
    tx.send(Event::CompletionResponse(prompt, reply))?;

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs each action on its own task so the loop can keep receiving. Only
    /// a single completion is ever outstanding, the session refuses new
    /// submissions until the previous reply arrives.
    pub async fn start(
        backend: CompletionBox,
        auth: AuthenticatorBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend = Arc::new(backend);
        let auth = Arc::new(auth);

        while let Some(action) = rx.recv().await {
            let worker_tx = tx.clone();
            match action {
                Action::LoginRequest(credentials, generation) => {
                    let worker_auth = auth.clone();
                    tokio::spawn(async move {
                        return login(&worker_auth, credentials, generation, &worker_tx).await;
                    });
                }
                Action::CompletionRequest(prompt) => {
                    let worker_backend = backend.clone();
                    tokio::spawn(async move {
                        return completion(&worker_backend, prompt, &worker_tx).await;
                    });
                }
            }
        }

        return Ok(());
    }
}
