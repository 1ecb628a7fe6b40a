#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::anyhow;
use anyhow::Error;
use domain::models::Action;
use domain::models::Event;
use infrastructure::auth::AuthManager;
use infrastructure::completions::CompletionManager;
use tokio::sync::mpsc;
use tokio::task;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::domain::services::actions::ActionsService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! Chatterbox has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
        eprintln!(
            "\nFor request level detail, run with RUST_LOG=chatterbox and read the file printed by `chatterbox debug log-path`."
        );
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let dotenv_res = dotenv::dotenv();

    let file_appender = tracing_appender::rolling::never(cli::log_dir(), "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("chatterbox")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }
    if let Err(err) = dotenv_res {
        if !cli::is_missing_dotenv(&err) {
            tracing::debug!(error = %err, "Failed to load .env");
        }
    }

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(ready_err) => {
            handle_error(ready_err);
            return;
        }
    }

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(
            CompletionManager::get(),
            AuthManager::get(),
            event_tx,
            &mut action_rx,
        )
        .await;
    });

    let ui_future = ui::start(action_tx, event_rx);

    let res = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(join_err)) => Err(anyhow!(join_err)),
            None => Err(anyhow!("Background services stopped unexpectedly")),
        },
        res = ui_future => res,
    );

    if let Err(err) = res {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
