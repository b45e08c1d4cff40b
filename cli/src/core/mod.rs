//! # dictbot Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the core pieces every command relies on:
//! - `config`: Configuration loading and validation
//! - `error`: Error types and the `Result` alias
//! - `model`: The lookup data model (query, result, entries)
//! - `formatting`: Rendering of a dictionary entry into a chat message
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{DictbotError, Result};
//! use crate::core::formatting::{format_entry, FormatLimits};
//! use crate::core::model::{LookupQuery, LookupResult};
//! ```
//!
pub mod config;
pub mod error;
pub mod formatting;
pub mod model;
