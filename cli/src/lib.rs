//! # runprep Library
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! Idempotent helpers used by job-orchestration code to prepare run
//! directories, plus the command handlers behind the `runprep` binary.
//!
//! - `common::fs`: `ensure_directory`, `ensure_symlink`, `patch_text_file`
//! - `core`: configuration, run manifests, error types
//! - `commands`: CLI subcommand handlers
//!
pub mod commands; // CLI subcommand handlers (mkdir, link, patch, prepare)
pub mod common; // Shared utilities (fs)
pub mod core; // Core infrastructure (errors, config, manifest)
