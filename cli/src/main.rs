//! # dictbot Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for dictbot, a Telegram bot that looks up English words in a
//! public dictionary service and replies with a short formatted definition.
//! This file handles:
//! - Command-line argument parsing using Clap
//! - Setting up logging based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the bot
//! DICTBOT_TOKEN=123456:ABC dictbot run
//!
//! # Try a lookup locally, with debug logs
//! dictbot -vv define computer
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (run, define)
mod common; // Network clients
mod core; // Config, errors, data model, formatting

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "dictbot",
    about = "📚 dictbot: English dictionary lookups over Telegram",
    long_about = "Relays words to a public dictionary service and replies with the first\n\
                  definition entry: pronunciation, parts of speech, definitions and examples.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Path to a TOML configuration file.
    #[arg(long, global = true, env = "DICTBOT_CONFIG")]
    config: Option<String>,
}

/// Available commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Start the Telegram bot.
    Run(commands::run::RunArgs),
    /// Look up a word and print the reply.
    #[command(alias = "d")]
    Define(commands::define::DefineArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    // The run command may carry the token, so only global flags are logged.
    tracing::debug!(
        "Parsed CLI arguments: verbose={}, config={:?}",
        cli.verbose,
        cli.config
    );

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Run(args) => commands::run::handle_run(args, config_path).await,
        Commands::Define(args) => commands::define::handle_define(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_define_collects_words() {
        let cli = Cli::try_parse_from(["dictbot", "define", "ice", "cream"]).expect("parse");
        match cli.command {
            Commands::Define(args) => assert_eq!(args.words, vec!["ice", "cream"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["dictbot", "define", "-vv", "word"]).expect("parse");
        assert_eq!(cli.verbose, 2);
    }
}
