//! # dictbot Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the dictbot CLI so that
//! `main.rs` can route to them.
//!
//! ## Commands
//!
//! - `run`: Start the Telegram bot (long polling until interrupted)
//! - `define`: Look up one word and print the reply, no chat platform needed
//!
//! Each command defines its own arguments struct and an async handler.
//!

/// One-shot lookup printed to stdout.
pub mod define;
/// The long-running Telegram bot, including message routing.
pub mod run;
