//! # runprep Patch Handler
//!
//! File: cli/src/commands/patch.rs
//!
//! ## Overview
//!
//! Implements `runprep patch`, which replaces every line of a text file that
//! starts with a (case-insensitive) match of `PATTERN` by `REPLACEMENT`.
//! A missing file is silently skipped.
//!
//! The replacement is written as a whole line: a trailing newline is added
//! unless it already ends with one or `--no-newline` is given.
//!
//! ## Usage
//!
//! ```bash
//! runprep patch work/input.nml '\s*days' '    days = 31'
//! ```
//!
use crate::{common::fs::patch::patch_text_file, core::error::Result};
use anyhow::Context;
use clap::Parser;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `runprep patch`.
#[derive(Parser, Debug)]
#[command(about = "Replace lines matching a pattern in a text file")]
pub struct PatchArgs {
    /// Text file to patch. Nothing happens if it does not exist.
    path: PathBuf,
    /// Regular expression matched case-insensitively at the start of each line.
    pattern: String,
    /// Line written in place of each matching line.
    replacement: String,
    /// Write the replacement exactly as given, without adding a newline.
    #[arg(long)]
    no_newline: bool,
}

/// Main handler for `runprep patch`.
pub fn handle_patch(args: PatchArgs) -> Result<()> {
    info!(
        "Handling patch command (Path: {:?}, Pattern: {:?})",
        args.path, args.pattern
    );
    let replacement = as_line(&args.replacement, !args.no_newline);
    patch_text_file(&args.path, &args.pattern, &replacement)
        .with_context(|| format!("Failed to patch {}", args.path.display()))?;
    Ok(())
}

/// Returns `replacement` with a trailing `\n` when `newline` is set and it has none.
pub(crate) fn as_line(replacement: &str, newline: bool) -> Cow<'_, str> {
    if newline && !replacement.ends_with('\n') {
        Cow::Owned(format!("{replacement}\n"))
    } else {
        Cow::Borrowed(replacement)
    }
}
