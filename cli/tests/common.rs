//! # dictbot Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every command
//! built here runs against an empty temporary config file with the
//! dictbot environment variables removed, so the developer's own settings
//! never leak into a test run.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::net::TcpListener;
use tempfile::NamedTempFile;

/// # Get dictbot Command (`dictbot_cmd`)
///
/// Returns a command for the compiled `dictbot` binary plus the temp config
/// file it points at. Keep the file alive for the duration of the test.
pub fn dictbot_cmd() -> (Command, NamedTempFile) {
    let config = NamedTempFile::new().expect("Failed to create temp config file");
    let mut cmd = Command::cargo_bin("dictbot").expect("Failed to find dictbot binary for testing");
    cmd.env_remove("DICTBOT_TOKEN")
        .env_remove("DICTBOT_CONFIG")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config.path());
    (cmd, config)
}

/// An http URL on a local port with nothing listening behind it.
pub fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    let addr = listener.local_addr().expect("Probe port has no address");
    drop(listener);
    format!("http://{}/api/v2/entries/en", addr)
}
