//! # runprep CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files (`fsops.rs`, `prepare.rs`,
//! `main_tests.rs`). Each test runs the compiled `runprep` binary inside its
//! own temporary directory.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// Returns an `assert_cmd::Command` for the compiled `runprep` binary.
///
/// ## Panics
/// Panics if the `runprep` binary cannot be found via `Command::cargo_bin`.
pub fn runprep_cmd() -> Command {
    Command::cargo_bin("runprep").expect("Failed to find runprep binary for testing")
}

/// `runprep_cmd()` with its working directory set to `dir`.
pub fn runprep_in(dir: &Path) -> Command {
    let mut cmd = runprep_cmd();
    cmd.current_dir(dir);
    cmd
}
