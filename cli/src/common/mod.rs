//! # dictbot Common Utilities
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared building blocks used by the command modules. Currently this is the
//! `network` module, which holds the HTTP clients for the dictionary service
//! and the Telegram Bot API.
//!

/// HTTP clients for the dictionary service and the chat platform.
pub mod network;
