//! # dictbot Run Command
//!
//! File: cli/src/commands/run/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `dictbot run`, which starts the Telegram bot and serves
//! dictionary lookups until interrupted.
//!
//! ## Architecture
//!
//! - `bot.rs`: routing of incoming texts and reply rendering
//! - `polling.rs`: the long-polling loop and per-message tasks
//!
//! ## Examples
//!
//! ```bash
//! # Token from the environment
//! DICTBOT_TOKEN=123456:ABC dictbot run
//!
//! # Token and limits from a config file, with info logging
//! dictbot -v --config ~/dictbot.toml run
//! ```
//!
//! Startup flow:
//! 1. Load and validate configuration, require a token
//! 2. Connect the dictionary client (once, shared by all messages)
//! 3. Verify the token with `getMe`
//! 4. Poll until Ctrl+C / SIGTERM, then close the dictionary client
//!
//! Any failure in steps 1-3 aborts startup.
//!
use crate::common::network::dictionary::DictionaryClient;
use crate::common::network::telegram::TelegramClient;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Routing and rendering of replies.
pub mod bot;
/// Telegram long-polling loop.
pub mod polling;

use bot::DictionaryBot;

/// # Run Command Arguments (`RunArgs`)
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Telegram bot token. Overrides `[telegram].token` from the config file.
    #[arg(long, env = "DICTBOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// # Handle Run Command (`handle_run`)
///
/// Starts the bot and blocks until a shutdown signal is received.
///
/// ## Arguments
///
/// * `args`: Parsed `RunArgs`.
/// * `config_path`: Optional config file path from the global `--config` flag.
///
/// ## Errors
///
/// Returns an error if configuration is invalid, no token is configured, the
/// dictionary client cannot be created, or the token is rejected by Telegram.
pub async fn handle_run(args: RunArgs, config_path: Option<&str>) -> Result<()> {
    let cfg = config::load_config(config_path)?.with_token(args.token);
    let token = cfg.require_token()?.to_string();

    let mut client = DictionaryClient::from_config(&cfg)?;
    client
        .connect()
        .context("Failed to connect the dictionary client")?;

    let telegram = TelegramClient::new(&cfg.telegram.api_url, &token, cfg.poll_timeout())?;
    let me = match telegram.get_me().await {
        Ok(me) => me,
        Err(e) => {
            client.close();
            return Err(e.context("Failed to verify the Telegram bot token"));
        }
    };
    info!(
        "🤖 Bot started as @{} ({})",
        me.username.as_deref().unwrap_or(&me.first_name),
        me.id
    );

    let bot = Arc::new(DictionaryBot::new(client, cfg.format_limits()));
    let result = polling::run_polling(
        Arc::new(telegram),
        Arc::clone(&bot),
        cfg.poll_timeout(),
        shutdown_signal(),
    )
    .await;

    match Arc::try_unwrap(bot) {
        Ok(bot) => bot.into_client().close(),
        // Dropping the last reference still releases the pool.
        Err(_) => warn!("Dictionary client still shared at shutdown; releasing on drop."),
    }
    info!("Bot stopped.");
    result
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves on Ctrl+C, or on SIGTERM on Unix systems.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, stopping bot..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, stopping bot...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
