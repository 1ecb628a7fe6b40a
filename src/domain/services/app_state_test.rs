use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;

use super::AppState;
use super::LoginField;
use crate::domain::models::Action;
use crate::domain::models::AuthError;
use crate::domain::models::Authenticator;
use crate::domain::models::AuthenticatorBox;
use crate::domain::models::Completion;
use crate::domain::models::CompletionBox;
use crate::domain::models::CompletionError;
use crate::domain::models::CompletionPrompt;
use crate::domain::models::CompletionReply;
use crate::domain::models::Credentials;
use crate::domain::models::Event;
use crate::domain::models::Identity;
use crate::domain::models::ReplyType;
use crate::domain::models::TextArea;
use crate::domain::models::Turn;
use crate::domain::models::INVALID_LOGIN_NOTICE;
use crate::domain::services::SessionPhase;

fn type_text(
    app_state: &mut AppState,
    tx: &mpsc::UnboundedSender<Action>,
    text: &str,
) -> Result<()> {
    for char in text.chars() {
        app_state.handle_event(
            Event::KeyboardCharInput(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            }),
            tx,
        )?;
    }

    return Ok(());
}

fn reply(text: &str) -> CompletionReply {
    return CompletionReply {
        text: text.to_string(),
        rtype: ReplyType::Normal,
    };
}

fn logged_in() -> AppState<'static> {
    let mut app_state = AppState::default();
    app_state
        .session
        .set_identity(Identity::new("ada@example.com", "u-1"));

    return app_state;
}

fn to_login_request(action: Option<Action>) -> Result<Credentials> {
    return match action {
        Some(Action::LoginRequest(credentials, _)) => Ok(credentials),
        _ => bail!("Wrong type from recv"),
    };
}

fn to_completion_request(action: Option<Action>) -> Result<CompletionPrompt> {
    return match action {
        Some(Action::CompletionRequest(prompt)) => Ok(prompt),
        _ => bail!("Wrong type from recv"),
    };
}

struct Unconfigured {}

#[async_trait]
impl Completion for Unconfigured {
    async fn health_check(&self) -> Result<()> {
        bail!("Completion token is not defined");
    }

    async fn get_completion(&self, _prompt: &CompletionPrompt) -> Result<String, CompletionError> {
        return Err(CompletionError::NotConfigured(
            "Completion token is not defined".to_string(),
        ));
    }
}

#[async_trait]
impl Authenticator for Unconfigured {
    async fn health_check(&self) -> Result<()> {
        return Ok(());
    }

    async fn sign_in(&self, _credentials: &Credentials) -> Result<Identity, AuthError> {
        return Ok(Identity::new("ada@example.com", "u-1"));
    }
}

#[tokio::test]
async fn it_reports_health_check_failures() {
    let backend: CompletionBox = Box::new(Unconfigured {});
    let auth: AuthenticatorBox = Box::new(Unconfigured {});
    let app_state = AppState::new(&backend, &auth).await;

    assert_eq!(
        app_state.notice,
        Some(
            "❌ Replies won't work until this is fixed: Completion token is not defined"
                .to_string()
        )
    );
    assert_eq!(app_state.session.phase(), SessionPhase::LoggedOut);
}

mod login {
    use super::*;

    #[test]
    fn it_switches_fields_with_tab() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();

        type_text(&mut app_state, &tx, "ada@example.com")?;
        app_state.handle_event(Event::KeyboardTab(), &tx)?;
        assert_eq!(app_state.focus, LoginField::Password);
        type_text(&mut app_state, &tx, "hunter2")?;

        assert_eq!(TextArea::text(&app_state.email), "ada@example.com");
        assert_eq!(TextArea::text(&app_state.password), "hunter2");

        app_state.handle_event(Event::KeyboardTab(), &tx)?;
        assert_eq!(app_state.focus, LoginField::Email);

        return Ok(());
    }

    #[test]
    fn it_submits_credentials() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();

        type_text(&mut app_state, &tx, " ada@example.com ")?;
        app_state.handle_event(Event::KeyboardTab(), &tx)?;
        type_text(&mut app_state, &tx, "hunter2")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        let credentials = to_login_request(rx.try_recv().ok())?;
        assert_eq!(credentials.email, "ada@example.com");
        assert_eq!(credentials.password, "hunter2");
        assert!(app_state.logging_in);
        assert!(app_state.is_waiting());

        // Enter again while waiting doesn't send a second request.
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[test]
    fn it_logs_in_on_success() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        app_state.handle_event(
            Event::LoginResponse(0, Ok(Identity::new("ada@example.com", "u-1"))),
            &tx,
        )?;

        assert_eq!(app_state.session.phase(), SessionPhase::Idle);
        assert!(!app_state.logging_in);
        assert!(app_state.notice.is_none());
        assert_eq!(TextArea::text(&app_state.password), "");

        return Ok(());
    }

    #[test]
    fn it_shows_a_generic_notice_on_failure() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        app_state.handle_event(
            Event::LoginResponse(0, Err(AuthError::InvalidCredentials(
                "INVALID_LOGIN_CREDENTIALS".to_string(),
            ))),
            &tx,
        )?;

        assert_eq!(app_state.session.phase(), SessionPhase::LoggedOut);
        assert_eq!(app_state.notice, Some(INVALID_LOGIN_NOTICE.to_string()));

        return Ok(());
    }

    #[test]
    fn it_drops_login_responses_after_reset() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        app_state.handle_event(Event::KeyboardCTRLR(), &tx)?;

        app_state.handle_event(
            Event::LoginResponse(0, Ok(Identity::new("ada@example.com", "u-1"))),
            &tx,
        )?;

        assert!(app_state.session.identity().is_none());
        return Ok(());
    }

    #[test]
    fn it_applies_only_the_latest_login_after_reset() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();

        type_text(&mut app_state, &tx, "alice@example.com")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        let first = rx.try_recv().ok();
        app_state.handle_event(Event::KeyboardCTRLR(), &tx)?;

        type_text(&mut app_state, &tx, "bob@example.com")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        let second = rx.try_recv().ok();

        let (first_generation, second_generation) = match (first, second) {
            (
                Some(Action::LoginRequest(_, first_generation)),
                Some(Action::LoginRequest(credentials, second_generation)),
            ) => {
                assert_eq!(credentials.email, "bob@example.com");
                (first_generation, second_generation)
            }
            _ => bail!("Wrong type from recv"),
        };
        assert_ne!(first_generation, second_generation);

        app_state.handle_event(
            Event::LoginResponse(first_generation, Ok(Identity::new("alice@example.com", "u-a"))),
            &tx,
        )?;
        assert!(app_state.session.identity().is_none());
        assert!(app_state.logging_in);

        app_state.handle_event(
            Event::LoginResponse(second_generation, Ok(Identity::new("bob@example.com", "u-b"))),
            &tx,
        )?;
        assert_eq!(
            app_state.session.identity(),
            Some(&Identity::new("bob@example.com", "u-b"))
        );
        assert!(!app_state.logging_in);

        return Ok(());
    }
}

mod chat {
    use super::*;

    #[test]
    fn it_warns_on_empty_messages() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        type_text(&mut app_state, &tx, "   ")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert_eq!(app_state.notice, Some("Please type something.".to_string()));
        assert!(rx.try_recv().is_err());
        assert!(app_state.session.history().is_empty());
        assert_eq!(app_state.session.phase(), SessionPhase::Idle);

        return Ok(());
    }

    #[test]
    fn it_sends_and_records_a_message() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state.set_rect(ratatui::prelude::Rect::new(0, 0, 80, 20));

        type_text(&mut app_state, &tx, "hi")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        let prompt = to_completion_request(rx.try_recv().ok())?;
        assert_eq!(prompt.messages(), vec![Turn::user("hi")]);
        assert_eq!(TextArea::text(&app_state.prompt), "");
        assert_eq!(app_state.session.phase(), SessionPhase::AwaitingReply);

        // Typing is ignored while the reply is pending.
        type_text(&mut app_state, &tx, "more")?;
        assert_eq!(TextArea::text(&app_state.prompt), "");

        app_state.handle_event(Event::CompletionResponse(prompt, reply("Hello!")), &tx)?;

        assert_eq!(
            app_state.session.history(),
            &[Turn::user("hi"), Turn::assistant("Hello!")]
        );
        assert_eq!(app_state.session.phase(), SessionPhase::Idle);
        assert_eq!(app_state.transcript.len(), 2);

        return Ok(());
    }

    #[test]
    fn it_rejects_submissions_while_waiting() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        type_text(&mut app_state, &tx, "hi")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        to_completion_request(rx.try_recv().ok())?;

        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        assert!(rx.try_recv().is_err());
        assert_eq!(
            app_state.notice,
            Some("Still waiting for the last reply.".to_string())
        );

        return Ok(());
    }

    #[test]
    fn it_discards_replies_after_reset() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        type_text(&mut app_state, &tx, "hi")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;
        let prompt = to_completion_request(rx.try_recv().ok())?;

        app_state.handle_event(Event::KeyboardCTRLR(), &tx)?;
        app_state.handle_event(Event::CompletionResponse(prompt, reply("Hello!")), &tx)?;

        assert!(app_state.session.history().is_empty());
        assert_eq!(app_state.session.phase(), SessionPhase::LoggedOut);
        assert!(!app_state.is_waiting());

        return Ok(());
    }
}

mod handle_slash_commands {
    use super::*;

    #[test]
    fn it_breaks_on_quit() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        type_text(&mut app_state, &tx, "/q")?;
        let should_quit = app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(should_quit);
        return Ok(());
    }

    #[test]
    fn it_breaks_on_ctrl_c() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();

        assert!(app_state.handle_event(Event::KeyboardCTRLC(), &tx)?);
        return Ok(());
    }

    #[test]
    fn it_logs_out() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();
        app_state
            .session
            .complete_request(&CompletionPrompt::new("hi", &[], 0), &reply("Hello!"));

        type_text(&mut app_state, &tx, "/logout")?;
        let should_quit = app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(!should_quit);
        assert!(rx.try_recv().is_err());
        assert!(app_state.session.identity().is_none());
        assert!(app_state.session.history().is_empty());
        assert!(app_state.session.display_log().is_empty());
        assert_eq!(app_state.notice, Some("Logged out.".to_string()));

        return Ok(());
    }

    #[test]
    fn it_logs_out_with_ctrl_l() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        app_state.handle_event(Event::KeyboardCTRLL(), &tx)?;

        assert_eq!(app_state.session.phase(), SessionPhase::LoggedOut);
        assert_eq!(app_state.focus, LoginField::Email);
        return Ok(());
    }

    #[test]
    fn it_resets() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        type_text(&mut app_state, &tx, "/reset")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert_eq!(app_state.session.phase(), SessionPhase::LoggedOut);
        assert!(app_state.notice.is_none());
        return Ok(());
    }

    #[test]
    fn it_shows_help() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        type_text(&mut app_state, &tx, "/help")?;
        app_state.handle_event(Event::KeyboardEnter(), &tx)?;

        assert!(rx.try_recv().is_err());
        assert!(app_state
            .notice
            .clone()
            .unwrap_or_default()
            .contains("/logout"));
        assert_eq!(TextArea::text(&app_state.prompt), "");
        return Ok(());
    }
}

mod paste {
    use super::*;

    #[test]
    fn it_keeps_login_fields_single_line() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = AppState::default();

        app_state.handle_event(
            Event::KeyboardPaste("ada@example.com\r\n".to_string()),
            &tx,
        )?;

        assert_eq!(TextArea::text(&app_state.email), "ada@example.com");
        return Ok(());
    }

    #[test]
    fn it_keeps_newlines_in_messages() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let mut app_state = logged_in();

        app_state.handle_event(Event::KeyboardPaste("one\ntwo".to_string()), &tx)?;

        assert_eq!(TextArea::text(&app_state.prompt), "one\ntwo");
        return Ok(());
    }
}
