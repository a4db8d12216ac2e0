//! # runprep Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the runprep CLI. Each command is
//! a thin layer over one of the `common::fs` operations: it parses arguments,
//! pulls the relevant settings from the loaded configuration, calls the
//! operation, and reports the result.
//!
//! ## Commands
//!
//! - `mkdir`: `ensure_directory`
//! - `link`: `ensure_symlink`
//! - `patch`: `patch_text_file`
//! - `prepare`: apply a run manifest (directories, then links, then patches)
//!

/// `runprep mkdir <PATH>`: create a directory and its ancestors.
pub mod mkdir;
/// `runprep link <SOURCE> <LINK>`: create or repoint a symbolic link.
pub mod link;
/// `runprep patch <PATH> <PATTERN> <REPLACEMENT>`: replace matching lines.
pub mod patch;
/// `runprep prepare [MANIFEST]`: apply a whole run manifest.
pub mod prepare;
