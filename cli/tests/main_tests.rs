//! # dictbot CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Top-level behavior of the `dictbot` binary: standard flags and the
//! startup checks of `dictbot run`.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn test_help_lists_commands() {
    let (mut cmd, _config) = dictbot_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("define"));
}

#[test]
fn test_version_flag() {
    let (mut cmd, _config) = dictbot_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_without_token_aborts_startup() {
    let (mut cmd, _config) = dictbot_cmd();
    cmd.arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("DICTBOT_TOKEN"));
}

#[test]
fn test_invalid_config_aborts_startup() {
    let (mut cmd, mut config) = dictbot_cmd();
    config
        .write_all(b"[format]\nmax_examples = 0\n")
        .expect("Failed to write config");

    cmd.args(["define", "word"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_examples"));
}
