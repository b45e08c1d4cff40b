//! # dictbot Telegram Bot API Client
//!
//! File: cli/src/common/network/telegram.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A small client for the parts of the Telegram Bot API the bot needs:
//! `getMe` (token check at startup), `getUpdates` (long polling) and
//! `sendMessage` (replies). Every method is a JSON POST to
//! `{api_url}/bot{token}/{method}` answered by the standard
//! `{"ok": ..., "result": ..., "description": ...}` envelope.
//!
//! Error messages never contain the request URL, since it embeds the token.
//!
//! Replies longer than `MAX_MESSAGE_LEN` are split into several messages,
//! preferably at line breaks so Markdown spans stay within one part.
//!
use crate::core::config;
use crate::core::error::{DictbotError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Extra time on top of the long-poll timeout before the HTTP client gives up.
const POLL_SLACK: Duration = Duration::from_secs(10);

/// Parse mode used for formatted replies.
pub const PARSE_MODE_MARKDOWN: &str = "Markdown";

/// Longest text `sendMessage` accepts, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Description fragment Telegram uses when it cannot parse the markup.
const ENTITY_PARSE_ERROR: &str = "can't parse entities";

#[derive(Deserialize, Debug)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// One incoming update. Only message updates are requested.
#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: i64,
}

/// The bot's own account, as returned by `getMe`.
#[derive(Deserialize, Debug, Clone)]
pub struct BotUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Serialize, Debug)]
struct GetUpdatesParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize, Debug)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Serialize, Debug)]
struct NoParams {}

/// Client for the Telegram Bot API.
pub struct TelegramClient {
    http: reqwest::Client,
    bot_url: String,
}

impl TelegramClient {
    /// # Create Client (`new`)
    ///
    /// Builds a client for `api_url` authenticated with `token`. The HTTP
    /// timeout is `poll_timeout` plus a fixed slack so a long poll that
    /// returns empty is never cut short.
    ///
    /// ## Errors
    ///
    /// Returns an error if `api_url` is not an http(s) URL or the HTTP
    /// client cannot be built.
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self> {
        config::validate_endpoint(api_url)?;
        let http = reqwest::Client::builder()
            .timeout(poll_timeout + POLL_SLACK)
            .build()
            .map_err(|source| DictbotError::Http { source })?;
        Ok(Self {
            http,
            bot_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        debug!("Calling Telegram API method {}", method);
        let response = self
            .http
            .post(format!("{}/{}", self.bot_url, method))
            .json(params)
            .send()
            .await
            .map_err(|e| DictbotError::Http {
                source: e.without_url(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| DictbotError::Http {
            source: e.without_url(),
        })?;

        let envelope: ApiResponse<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(DictbotError::TelegramApi {
                    method: method.to_string(),
                    status: status.as_u16(),
                    description: format!("unreadable response body: {}", e),
                }
                .into())
            }
        };

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(DictbotError::TelegramApi {
                method: method.to_string(),
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }
            .into()),
        }
    }

    /// Fetches the bot account; used at startup to verify the token.
    pub async fn get_me(&self) -> Result<BotUser> {
        self.call("getMe", &NoParams {}).await
    }

    /// Long-polls for message updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>> {
        let params = GetUpdatesParams {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };
        self.call("getUpdates", &params).await
    }

    /// Sends `text` to `chat_id`, optionally with a parse mode.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<()> {
        let params = SendMessageParams {
            chat_id,
            text,
            parse_mode,
        };
        // The sent Message object is not needed.
        let _: serde_json::Value = self.call("sendMessage", &params).await?;
        Ok(())
    }

    /// # Send Formatted Reply (`send_reply`)
    ///
    /// Sends `text` as Markdown, split into parts of at most
    /// `MAX_MESSAGE_LEN`. Dictionary content can contain characters that
    /// break Telegram's Markdown parser; when the API rejects a part's markup
    /// that part is sent again as plain text. Any other failure is returned.
    pub async fn send_reply(&self, chat_id: i64, text: &str) -> Result<()> {
        let parts = chunk_text(text, MAX_MESSAGE_LEN);
        if parts.len() > 1 {
            debug!("Reply to chat {} split into {} parts", chat_id, parts.len());
        }
        for part in parts {
            match self.send_message(chat_id, part, Some(PARSE_MODE_MARKDOWN)).await {
                Ok(()) => {}
                Err(e) if is_markdown_rejection(&e) => {
                    warn!(
                        "Markdown reply to chat {} rejected ({}), resending as plain text",
                        chat_id, e
                    );
                    self.send_message(chat_id, part, None).await?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn is_markdown_rejection(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DictbotError>(),
        Some(DictbotError::TelegramApi { status: 400, description, .. })
            if description.contains(ENTITY_PARSE_ERROR)
    )
}

/// # Chunk Text (`chunk_text`)
///
/// Splits `text` into parts of at most `max_len` UTF-16 code units, cutting
/// at the last line break that fits when there is one. The line break at a
/// cut is dropped. Text that already fits is returned as a single part.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let split = find_split_point(rest, max_len);
        let (part, tail) = rest.split_at(split);
        parts.push(part);
        rest = tail.strip_prefix('\n').unwrap_or(tail);
    }
    if parts.is_empty() {
        parts.push(text);
    }
    parts
}

/// Byte index where `text` should be cut so the head fits in `max_len`
/// UTF-16 code units. Always a char boundary, and never zero for non-empty
/// text.
pub fn find_split_point(text: &str, max_len: usize) -> usize {
    let mut units = 0;
    let mut limit = text.len();
    for (idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > max_len {
            limit = idx;
            break;
        }
    }
    if limit == text.len() {
        return limit;
    }

    match text[..limit].rfind('\n') {
        Some(newline) if newline > 0 => newline,
        _ if limit > 0 => limit,
        // Not even one char fits; emit it alone to make progress.
        _ => text.chars().next().map_or(text.len(), char::len_utf8),
    }
}
