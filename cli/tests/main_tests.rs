//! # runprep CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Verifies top-level behaviour of the `runprep` binary: `--help`,
//! `--version`, and rejection of unknown subcommands.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_main_help_flag() {
    runprep_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("link"));
}

#[test]
fn test_main_version_flag() {
    runprep_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    runprep_cmd().arg("frobnicate").assert().failure();
}
