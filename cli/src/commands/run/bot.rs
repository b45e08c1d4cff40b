//! # dictbot Message Handling
//!
//! File: cli/src/commands/run/bot.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns one incoming chat text into the reply text. This is transport
//! independent: the Telegram polling loop and the `define` command both go
//! through `DictionaryBot`.
//!
//! ## Routing
//!
//! | Incoming text          | Reply                                        |
//! |------------------------|----------------------------------------------|
//! | `/start`               | Welcome message                              |
//! | `/help`                | Command list                                 |
//! | `/define` (no args)    | Usage hint, no lookup                        |
//! | `/define <words...>`   | Lookup of the words joined by single spaces  |
//! | other `/command`       | No reply                                     |
//! | blank text             | Usage hint, no lookup                        |
//! | any other text         | Lookup of the trimmed text                   |
//!
//! A lookup that yields `NotFound`, `TransientError` or no entries gets the
//! same "no definition" reply. Otherwise only the first entry is formatted.
//!
//! `handle_guarded` runs the handling on its own task so that a panic while
//! producing a reply becomes a logged error and a generic apology instead of
//! taking the caller down with it.
//!
use crate::common::network::dictionary::DictionaryClient;
use crate::core::formatting::{format_entry, FormatLimits};
use crate::core::model::LookupQuery;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

pub const WELCOME_MESSAGE: &str = "📚 *English Dictionary*\n\n\
I can look up definitions of English words with:\n\
- Usage examples\n\
- Pronunciation\n\
- Parts of speech\n\n\
*How to use me:*\n\
• Type a word directly\n\
• Use `/define [word]`\n\
• Use `/help` for help\n\n\
*Example:*\n\
`/define computer`";

pub const HELP_MESSAGE: &str = "ℹ️ *Dictionary Help*\n\n\
Available commands:\n\
/start - Welcome message\n\
/help - This help\n\
/define [word] - Look up a definition\n\n\
You can also type words directly.";

pub const USAGE_MESSAGE: &str = "ℹ️ Usage: /define [word]";

pub const UNEXPECTED_ERROR_MESSAGE: &str =
    "⚠️ An unexpected error occurred while processing your request.";

/// Classification of one incoming text.
#[derive(Debug, PartialEq, Eq)]
enum Incoming {
    Start,
    Help,
    Define(String),
    Word(String),
    OtherCommand(String),
}

fn classify(text: &str) -> Incoming {
    let trimmed = text.trim();
    if !trimmed.starts_with('/') {
        return Incoming::Word(trimmed.to_string());
    }

    let mut parts = trimmed.split_whitespace();
    let head = parts.next().unwrap_or_default();
    // Group chats address commands as /define@SomeBot.
    let command = head.split('@').next().unwrap_or(head);

    match command {
        "/start" => Incoming::Start,
        "/help" => Incoming::Help,
        "/define" => Incoming::Define(parts.collect::<Vec<_>>().join(" ")),
        other => Incoming::OtherCommand(other.to_string()),
    }
}

fn not_found_message(word: &str) -> String {
    format!(
        "🔍 No definition found for *{}*\n\n\
         Try:\n\
         - Checking the spelling\n\
         - Using English words\n\
         - More common terms",
        word
    )
}

/// The bot: a connected lookup client plus the reply limits.
pub struct DictionaryBot {
    client: DictionaryClient,
    limits: FormatLimits,
}

impl DictionaryBot {
    pub fn new(client: DictionaryClient, limits: FormatLimits) -> Self {
        Self { client, limits }
    }

    /// Gives back the lookup client so the owner can `close()` it at shutdown.
    pub fn into_client(self) -> DictionaryClient {
        self.client
    }

    /// # Reply To Text (`reply_to`)
    ///
    /// Routes one incoming text (see the module table). Returns `None` when the
    /// text should be ignored.
    pub async fn reply_to(&self, text: &str) -> Option<String> {
        match classify(text) {
            Incoming::Start => Some(WELCOME_MESSAGE.to_string()),
            Incoming::Help => Some(HELP_MESSAGE.to_string()),
            Incoming::Define(word) | Incoming::Word(word) => Some(self.define(&word).await),
            Incoming::OtherCommand(command) => {
                debug!("Ignoring unsupported command {}", command);
                None
            }
        }
    }

    /// # Define Word (`define`)
    ///
    /// Looks up `word` and renders the reply. Blank input returns the usage
    /// hint without touching the network.
    pub async fn define(&self, word: &str) -> String {
        let word = word.trim();
        if word.is_empty() {
            return USAGE_MESSAGE.to_string();
        }

        let result = self.client.lookup(&LookupQuery::new(word)).await;
        match result.first_entry() {
            Some(entry) => format_entry(entry, self.limits),
            None => not_found_message(word),
        }
    }

    /// # Guarded Handling (`handle_guarded`)
    ///
    /// Runs `reply_to` on a separate task. If that task panics, the fault is
    /// logged and the generic apology is returned in place of a reply.
    pub async fn handle_guarded(self: &Arc<Self>, text: String) -> Option<String> {
        let bot = Arc::clone(self);
        let incoming = text.clone();
        run_guarded(&incoming, async move { bot.reply_to(&text).await }).await
    }
}

/// Spawns `handling` and converts a panic inside it into the apology reply.
/// `incoming` is the text being handled, logged with the fault.
async fn run_guarded<F>(incoming: &str, handling: F) -> Option<String>
where
    F: Future<Output = Option<String>> + Send + 'static,
{
    match tokio::spawn(handling).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(
                "Unexpected fault while handling message {:?}: {}",
                incoming, e
            );
            Some(UNEXPECTED_ERROR_MESSAGE.to_string())
        }
    }
}
