//! # runprep Link Handler
//!
//! File: cli/src/commands/link.rs
//!
//! ## Overview
//!
//! Implements `runprep link`, which makes `LINK` a symbolic link to `SOURCE`.
//! The Lustre path-length workaround follows `links.check_lustre_path_len`
//! from the configuration and can be switched off per call.
//!
//! A regular file or directory already at `LINK` is kept; the command warns
//! and still exits successfully.
//!
//! ## Usage
//!
//! ```bash
//! runprep link /scratch/inputs/grid_spec.nc work/INPUT/grid_spec.nc
//! runprep link --no-lustre-check ../restart000 work/RESTART
//! ```
//!
use crate::{
    common::fs::links::{ensure_symlink, LinkOptions, LinkOutcome},
    core::{config, error::Result},
};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `runprep link`.
#[derive(Parser, Debug)]
#[command(about = "Create or repoint a symbolic link")]
pub struct LinkArgs {
    /// Path the link should point at (stored verbatim in the link).
    source: PathBuf,
    /// Where the link is created.
    link: PathBuf,
    /// Disable the Lustre 60-character path workaround for this call.
    #[arg(long)]
    no_lustre_check: bool,
}

/// Main handler for `runprep link`.
pub fn handle_link(args: LinkArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let options = effective_options(cfg.links.link_options(), args.no_lustre_check);
    let outcome = link_with_options(&args, &options)?;
    println!(
        "{} -> {} ({})",
        args.link.display(),
        args.source.display(),
        outcome
    );
    Ok(())
}

/// Applies a `--no-lustre-check` override on top of the configured options.
pub(crate) fn effective_options(configured: LinkOptions, no_lustre_check: bool) -> LinkOptions {
    LinkOptions {
        check_lustre_path_len: configured.check_lustre_path_len && !no_lustre_check,
    }
}

fn link_with_options(args: &LinkArgs, options: &LinkOptions) -> Result<LinkOutcome> {
    info!(
        "Handling link command (Source: {:?}, Link: {:?}, Options: {:?})",
        args.source, args.link, options
    );
    ensure_symlink(&args.source, &args.link, options).with_context(|| {
        format!(
            "Failed to link {} -> {}",
            args.link.display(),
            args.source.display()
        )
    })
}
