//! # runprep Mkdir Handler
//!
//! File: cli/src/commands/mkdir.rs
//!
//! ## Overview
//!
//! Implements `runprep mkdir`, which ensures each given directory exists,
//! creating missing ancestors. Existing directories are left untouched.
//!
//! ## Usage
//!
//! ```bash
//! runprep mkdir work/INPUT archive/output000
//! ```
//!
use crate::{common::fs::io::ensure_directory, core::error::Result};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `runprep mkdir`.
#[derive(Parser, Debug)]
#[command(about = "Create directories (and missing parents) if absent")]
pub struct MkdirArgs {
    /// One or more directory paths to ensure.
    #[arg(required = true, num_args = 1..)]
    paths: Vec<PathBuf>,
}

/// Ensures every directory in `args.paths` exists, stopping at the first failure.
pub fn handle_mkdir(args: MkdirArgs) -> Result<()> {
    info!("Handling mkdir command (Paths: {:?})", args.paths);
    for path in &args.paths {
        ensure_directory(path)
            .with_context(|| format!("Failed to ensure directory {}", path.display()))?;
    }
    Ok(())
}
