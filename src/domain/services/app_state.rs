#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use super::actions::help_text;
use super::Scroll;
use super::SessionPhase;
use super::SessionStore;
use super::Transcript;
use crate::domain::models::Action;
use crate::domain::models::AuthenticatorBox;
use crate::domain::models::CompletionBox;
use crate::domain::models::Credentials;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::SlashCommand;
use crate::domain::models::TextArea;
use crate::domain::models::INVALID_LOGIN_NOTICE;

/// Replays pasted text as key presses. Login fields are single line.
fn paste(textarea: &mut tui_textarea::TextArea, text: &str, multiline: bool) {
    for char in text.chars() {
        let key = match char {
            '\r' => continue,
            '\n' if !multiline => continue,
            '\n' => Key::Enter,
            _ => Key::Char(char),
        };

        textarea.input(Input {
            key,
            ctrl: false,
            alt: false,
        });
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Everything the UI loop needs for one session. Dropped when the program
/// exits, nothing is persisted.
pub struct AppState<'a> {
    pub session: SessionStore,
    pub email: tui_textarea::TextArea<'a>,
    pub password: tui_textarea::TextArea<'a>,
    pub prompt: tui_textarea::TextArea<'a>,
    pub focus: LoginField,
    pub logging_in: bool,
    pub notice: Option<String>,
    pub loading: Loading,
    pub scroll: Scroll,
    pub transcript: Transcript,
    pub last_known_height: u16,
    pub last_known_width: u16,
}

impl<'a> Default for AppState<'a> {
    fn default() -> AppState<'a> {
        let mut app_state = AppState {
            session: SessionStore::default(),
            email: TextArea::email(),
            password: TextArea::password(),
            prompt: TextArea::prompt(),
            focus: LoginField::Email,
            logging_in: false,
            notice: None,
            loading: Loading::default(),
            scroll: Scroll::default(),
            transcript: Transcript::default(),
            last_known_height: 0,
            last_known_width: 0,
        };
        app_state.sync_focus();

        return app_state;
    }
}

impl<'a> AppState<'a> {
    /// Starts logged out. Configuration problems found by the health checks
    /// are shown on the login screen.
    pub async fn new(backend: &CompletionBox, auth: &AuthenticatorBox) -> AppState<'a> {
        let mut app_state = AppState::default();

        let mut problems = vec![];
        if let Err(err) = auth.health_check().await {
            tracing::warn!(error = %err, "Authentication provider failed health check");
            problems.push(format!("Logging in won't work until this is fixed: {err}"));
        }
        if let Err(err) = backend.health_check().await {
            tracing::warn!(error = %err, "Completion endpoint failed health check");
            problems.push(format!("Replies won't work until this is fixed: {err}"));
        }

        if !problems.is_empty() {
            app_state.notice = Some(format!("❌ {}", problems.join("\n❌ ")));
        }

        return app_state;
    }

    /// Routes one event. Returns true when the program should exit.
    pub fn handle_event(
        &mut self,
        event: Event,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        match event {
            Event::KeyboardCTRLC() => {
                return Ok(true);
            }
            Event::KeyboardCTRLL() => {
                self.logout();
            }
            Event::KeyboardCTRLR() => {
                self.reset();
            }
            Event::KeyboardEnter() => {
                if self.session.phase() == SessionPhase::LoggedOut {
                    self.submit_login(tx)?;
                } else {
                    return self.submit_prompt(tx);
                }
            }
            Event::KeyboardTab() => {
                if self.session.phase() == SessionPhase::LoggedOut {
                    self.focus = match self.focus {
                        LoginField::Email => LoginField::Password,
                        LoginField::Password => LoginField::Email,
                    };
                    self.sync_focus();
                }
            }
            Event::KeyboardCharInput(input) => {
                if let Some(textarea) = self.focused_textarea() {
                    textarea.input(input);
                }
            }
            Event::KeyboardPaste(text) => {
                let multiline = self.session.phase() != SessionPhase::LoggedOut;
                if let Some(textarea) = self.focused_textarea() {
                    paste(textarea, &text, multiline);
                }
            }
            Event::LoginResponse(generation, res) => {
                if !self.logging_in || generation != self.session.generation() {
                    tracing::debug!(
                        response_generation = generation,
                        generation = self.session.generation(),
                        "Dropping login response for a reset session"
                    );
                    return Ok(false);
                }

                self.logging_in = false;
                self.password = TextArea::password();
                match res {
                    Ok(identity) => {
                        self.session.set_identity(identity);
                        self.email = TextArea::email();
                        self.notice = None;
                    }
                    Err(_) => {
                        self.notice = Some(INVALID_LOGIN_NOTICE.to_string());
                    }
                }
                self.sync_focus();
            }
            Event::CompletionResponse(prompt, reply) => {
                if self.session.complete_request(&prompt, &reply) {
                    self.sync_dependants();
                    self.scroll.top();
                }
            }
            Event::UIScrollDown() => {
                self.scroll.down();
            }
            Event::UIScrollUp() => {
                self.scroll.up();
            }
            Event::UIScrollPageDown() => {
                self.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                self.scroll.up_page();
            }
            Event::UITick() => {
                if self.is_waiting() {
                    self.loading.tick();
                }
            }
        }

        return Ok(false);
    }

    pub fn is_waiting(&self) -> bool {
        return self.logging_in || self.session.phase() == SessionPhase::AwaitingReply;
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    /// Drops identity and conversation. A reply still in flight is discarded
    /// when it lands.
    pub fn reset(&mut self) {
        self.session.clear();
        self.email = TextArea::email();
        self.password = TextArea::password();
        self.prompt = TextArea::prompt();
        self.focus = LoginField::Email;
        self.logging_in = false;
        self.notice = None;
        self.scroll = Scroll::default();
        self.sync_focus();
        self.sync_dependants();
    }

    pub fn logout(&mut self) {
        let was_logged_in = self.session.identity().is_some();
        self.reset();
        if was_logged_in {
            self.notice = Some("Logged out.".to_string());
        }
    }

    fn submit_login(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.logging_in {
            return Ok(());
        }

        let credentials = Credentials {
            email: TextArea::text(&self.email).trim().to_string(),
            password: TextArea::text(&self.password),
        };

        self.logging_in = true;
        self.notice = None;
        tx.send(Action::LoginRequest(
            credentials,
            self.session.generation(),
        ))?;

        return Ok(());
    }

    fn submit_prompt(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        let text = TextArea::text(&self.prompt);

        if let Some(command) = SlashCommand::parse(&text) {
            self.prompt = TextArea::prompt();
            self.sync_focus();

            if command.is_quit() {
                return Ok(true);
            }
            if command.is_logout() {
                self.logout();
            } else if command.is_reset() {
                self.reset();
            } else if command.is_help() {
                self.notice = Some(help_text());
            }

            return Ok(false);
        }

        match self.session.begin_request(&text) {
            Ok(prompt) => {
                self.prompt = TextArea::prompt();
                self.notice = None;
                self.sync_focus();
                tx.send(Action::CompletionRequest(prompt))?;
            }
            Err(err) => {
                tracing::debug!(error = %err, "Submission rejected");
                self.notice = Some(err.to_string());
            }
        }

        return Ok(false);
    }

    fn focused_textarea(&mut self) -> Option<&mut tui_textarea::TextArea<'a>> {
        if self.is_waiting() {
            return None;
        }
        if self.session.phase() != SessionPhase::LoggedOut {
            return Some(&mut self.prompt);
        }

        return match self.focus {
            LoginField::Email => Some(&mut self.email),
            LoginField::Password => Some(&mut self.password),
        };
    }

    fn sync_focus(&mut self) {
        TextArea::set_focus(&mut self.email, self.focus == LoginField::Email);
        TextArea::set_focus(&mut self.password, self.focus == LoginField::Password);
        TextArea::set_focus(&mut self.prompt, true);
    }

    fn sync_dependants(&mut self) {
        self.transcript
            .set_exchanges(&self.session.display_log(), self.last_known_width);

        let list_length = u16::try_from(self.transcript.len()).unwrap_or(u16::MAX);
        self.scroll.set_state(list_length, self.last_known_height);
    }
}
