//! # dictbot Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used across dictbot. Domain failures
//! that callers may want to match on are variants of `DictbotError`; everything
//! else travels as `anyhow::Error` with context attached.
//!
//! ## Architecture
//!
//! - `DictbotError`: a `thiserror` enum covering configuration, endpoint,
//!   chat-platform and HTTP client failures.
//! - `Result<T>`: an alias for `anyhow::Result<T>`.
//!
//! The dictionary lookup itself never produces an error value: its outcomes
//! are reported through `LookupResult` (see `core::model`). These errors only
//! surface during startup and on the chat transport.
//!
//! ## Examples
//!
//! ```rust
//! if token.trim().is_empty() {
//!     return Err(DictbotError::MissingToken.into());
//! }
//!
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the dictbot application.
#[derive(Error, Debug)]
pub enum DictbotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No Telegram bot token configured. Set DICTBOT_TOKEN, pass --token, or add [telegram].token to the config file.")]
    MissingToken,

    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Telegram API call '{method}' failed (HTTP {status}): {description}")]
    TelegramApi {
        method: String,
        status: u16,
        description: String,
    },

    #[error("HTTP client error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
