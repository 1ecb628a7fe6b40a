use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::SessionPhase;
use crate::infrastructure::auth::AuthManager;
use crate::infrastructure::completions::CompletionManager;

fn header(app_state: &AppState) -> Paragraph<'static> {
    let text = match app_state.session.identity() {
        Some(identity) => format!(" Chatterbox · Logged in as {identity}"),
        None => " Chatterbox · Log in to start chatting".to_string(),
    };

    return Paragraph::new(text).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
}

fn notice(app_state: &AppState) -> Option<Paragraph<'static>> {
    let text = app_state.notice.clone()?;
    let mut style = Style::default().fg(Color::Yellow);
    if text.starts_with('❌') {
        style = Style::default().fg(Color::Red);
    }

    return Some(
        Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false }),
    );
}

fn notice_height(app_state: &AppState) -> u16 {
    return app_state
        .notice
        .as_ref()
        .map(|text| return u16::try_from(text.lines().count()).unwrap_or(u16::MAX))
        .unwrap_or(0);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);

    #[cfg(feature = "dev")]
    {
        use tui_textarea::Input;
        use tui_textarea::Key;

        for char in std::env::var("CHATTERBOX_DEV_EMAIL")
            .unwrap_or_default()
            .chars()
        {
            app_state.email.input(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
            });
        }
    }

    loop {
        terminal.draw(|frame| {
            let notice_lines = notice_height(app_state);

            if app_state.session.phase() == SessionPhase::LoggedOut {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(vec![
                        Constraint::Length(1),
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(1),
                    ])
                    .split(frame.size());

                frame.render_widget(header(app_state), layout[0]);
                frame.render_widget(app_state.email.widget(), layout[1]);
                frame.render_widget(app_state.password.widget(), layout[2]);

                if app_state.logging_in {
                    let loading_area = Rect::new(
                        layout[3].x,
                        layout[3].y,
                        layout[3].width,
                        layout[3].height.min(3),
                    );
                    frame.render_widget(app_state.loading.widget(), loading_area);
                } else if let Some(widget) = notice(app_state) {
                    frame.render_widget(widget, layout[3]);
                }

                return;
            }

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(notice_lines),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            frame.render_widget(header(app_state), layout[0]);
            frame.render_widget(
                app_state
                    .transcript
                    .widget("Conversation", app_state.scroll.position),
                layout[1],
            );
            if let Some(widget) = notice(app_state) {
                frame.render_widget(widget, layout[2]);
            }

            if app_state.is_waiting() {
                frame.render_widget(app_state.loading.widget(), layout[3]);
            } else {
                frame.render_widget(app_state.prompt.widget(), layout[3]);
            }
        })?;

        let event = events.next().await?;
        if app_state.handle_event(event, &tx)? {
            break;
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(
        io::stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    );
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(&CompletionManager::get(), &AuthManager::get()).await;

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, tx, rx).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
