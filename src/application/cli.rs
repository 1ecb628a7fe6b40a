#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;

use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::help_text;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn log_dir() -> String {
    if let Ok(dir) = std::env::var("CHATTERBOX_LOG_DIR") {
        return dir;
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return std::path::PathBuf::from("."))
        .join("chatterbox")
        .to_string_lossy()
        .to_string();
}

/// A missing `.env` is normal. Anything else is worth a debug line.
pub fn is_missing_dotenv(err: &dotenv::Error) -> bool {
    return match err {
        dotenv::Error::Io(io_err) => io_err.kind() == io::ErrorKind::NotFound,
        _ => false,
    };
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = std::path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        anyhow::bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Chatterbox")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Chatterbox with environment variable RUST_LOG=chatterbox")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start a new chat session. This is the default command.");
}

fn arg_completion_url() -> Arg {
    return Arg::new(ConfigKey::CompletionURL.to_string())
        .long(ConfigKey::CompletionURL.to_string())
        .env("CHATTERBOX_COMPLETION_URL")
        .num_args(1)
        .help(format!(
            "Chat completions endpoint conversations are sent to. [default: {}]",
            Config::default(ConfigKey::CompletionURL)
        ))
        .global(true);
}

fn arg_completion_token() -> Arg {
    return Arg::new(ConfigKey::CompletionToken.to_string())
        .long(ConfigKey::CompletionToken.to_string())
        .env("HUGGINGFACE_API_KEY")
        .hide_env_values(true)
        .num_args(1)
        .help("API token sent as a bearer credential to the completions endpoint.")
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("CHATTERBOX_MODEL")
        .num_args(1)
        .help(format!(
            "Model identifier requested from the completions endpoint. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .global(true);
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .env("CHATTERBOX_REQUEST_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time in milliseconds to wait on the completions endpoint and authentication provider before giving up. Use 0 to wait forever. [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ))
        .global(true);
}

fn arg_auth_url() -> Arg {
    return Arg::new(ConfigKey::AuthURL.to_string())
        .long(ConfigKey::AuthURL.to_string())
        .env("CHATTERBOX_AUTH_URL")
        .num_args(1)
        .help(format!(
            "Firebase Identity Toolkit API URL used to sign in. [default: {}]",
            Config::default(ConfigKey::AuthURL)
        ))
        .global(true);
}

fn arg_firebase_api_key() -> Arg {
    return Arg::new(ConfigKey::FirebaseApiKey.to_string())
        .long(ConfigKey::FirebaseApiKey.to_string())
        .env("FIREBASE_API_KEY")
        .hide_env_values(true)
        .num_args(1)
        .help("Firebase web API key of the project users sign in to.")
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("chatterbox")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("CHATTERBOX_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_completion_url())
        .arg(arg_completion_token())
        .arg(arg_model())
        .arg(arg_request_timeout())
        .arg(arg_auth_url())
        .arg(arg_firebase_api_key());
}

/// Handles one-shot subcommands. Returns true when the chat session should
/// start afterwards.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = std::path::PathBuf::from(log_dir()).join("debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
