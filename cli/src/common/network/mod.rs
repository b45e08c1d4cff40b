//! # dictbot Network Clients (`common::network`)
//!
//! File: cli/src/common/network/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Outbound HTTP clients, both built on `reqwest`:
//!
//! - **`dictionary`**: the lookup client for the public dictionary service.
//!   Converts every request outcome into a `LookupResult`.
//! - **`telegram`**: the Bot API client used by `dictbot run` to receive
//!   messages and send replies.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::network::dictionary::DictionaryClient;
//! use crate::common::network::telegram::TelegramClient;
//!
//! let mut lookup = DictionaryClient::from_config(&cfg)?;
//! lookup.connect()?;
//! let telegram = TelegramClient::new(&cfg.telegram.api_url, token, cfg.poll_timeout())?;
//! ```
//!

/// Dictionary service lookup client.
pub mod dictionary;
/// Telegram Bot API client.
pub mod telegram;
