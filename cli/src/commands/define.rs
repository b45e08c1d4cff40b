//! # dictbot Define Command
//!
//! File: cli/src/commands/define.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `dictbot define <word...>`: one lookup handled exactly like a
//! `/define` chat message, with the reply printed to stdout (markup
//! included). Useful for checking limits and endpoints without a bot token.
//!
//! ## Examples
//!
//! ```bash
//! dictbot define computer
//! dictbot define ice cream
//! dictbot define --api-url http://localhost:8080/api/v2/entries/en run
//! ```
//!
//! With no words the usage hint is printed and no request is made.
//!
use super::run::bot::DictionaryBot;
use crate::common::network::dictionary::DictionaryClient;
use crate::core::config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, warn};

/// # Define Command Arguments (`DefineArgs`)
#[derive(Parser, Debug)]
pub struct DefineArgs {
    /// Word (or words) to look up.
    #[arg(num_args = 0..)]
    pub words: Vec<String>,

    /// Dictionary endpoint to query instead of the configured one.
    #[arg(long)]
    pub api_url: Option<String>,
}

/// # Handle Define Command (`handle_define`)
///
/// Builds the same bot the chat transport uses, runs one `/define`, prints
/// the reply and closes the lookup client.
///
/// ## Errors
///
/// Returns an error only for configuration problems; lookup failures are
/// reported through the printed reply.
pub async fn handle_define(args: DefineArgs, config_path: Option<&str>) -> Result<()> {
    let cfg = config::load_config(config_path)?.with_dictionary_url(args.api_url);
    config::validate_config(&cfg).context("Invalid --api-url")?;

    let mut client = DictionaryClient::from_config(&cfg)?;
    client
        .connect()
        .context("Failed to connect the dictionary client")?;

    let bot = Arc::new(DictionaryBot::new(client, cfg.format_limits()));
    let text = format!("/define {}", args.words.join(" "));
    debug!("Handling '{}' locally", text);

    if let Some(reply) = bot.handle_guarded(text).await {
        println!("{}", reply);
    }

    match Arc::try_unwrap(bot) {
        Ok(bot) => bot.into_client().close(),
        Err(_) => warn!("Dictionary client still shared after the lookup; releasing on drop."),
    }
    Ok(())
}
