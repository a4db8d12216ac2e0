//! # runprep Prepare Handler
//!
//! File: cli/src/commands/prepare.rs
//!
//! ## Overview
//!
//! Implements `runprep prepare`, which applies a run manifest
//! (see `core::manifest`) to lay out a run directory.
//!
//! ## Architecture
//!
//! 1. Load configuration and pick the manifest: the positional argument, or
//!    `prepare.manifest` from the configuration (relative to the file that
//!    set it).
//! 2. Parse and validate the whole manifest before touching the disk.
//! 3. Ensure every directory, then every link, then apply every patch, in
//!    manifest order. The first propagated error aborts the run; the steps
//!    already done are idempotent, so rerunning after a fix is safe.
//! 4. Print a one-line summary.
//!
//! ## Usage
//!
//! ```bash
//! runprep prepare                       # uses prepare.manifest
//! runprep prepare runs/ocean/manifest.toml
//! runprep -v prepare --no-lustre-check manifest.toml
//! ```
//!
use crate::{
    commands::{link::effective_options, patch::as_line},
    common::fs::{
        io::ensure_directory,
        links::{ensure_symlink, LinkOptions, LinkOutcome},
        patch::patch_text_file,
    },
    core::{
        config,
        error::Result,
        manifest::{resolve_path, Manifest},
    },
};
use anyhow::Context;
use clap::Parser;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arguments for `runprep prepare`.
#[derive(Parser, Debug)]
#[command(about = "Apply a run manifest: directories, links, then patches")]
pub struct PrepareArgs {
    /// Manifest to apply. Defaults to `prepare.manifest` from the configuration.
    manifest: Option<PathBuf>,
    /// Disable the Lustre 60-character path workaround for all links.
    #[arg(long)]
    no_lustre_check: bool,
}

/// Counts of what a manifest run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrepareSummary {
    pub directories: usize,
    pub links_created: usize,
    pub links_unchanged: usize,
    pub links_replaced: usize,
    pub link_conflicts: usize,
    pub patches: usize,
}

impl PrepareSummary {
    fn record_link(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Created => self.links_created += 1,
            LinkOutcome::Unchanged => self.links_unchanged += 1,
            LinkOutcome::Replaced => self.links_replaced += 1,
            LinkOutcome::Conflict => self.link_conflicts += 1,
        }
    }
}

impl fmt::Display for PrepareSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, links: {} created, {} unchanged, {} replaced, {} conflicts, {} patches",
            self.directories,
            self.links_created,
            self.links_unchanged,
            self.links_replaced,
            self.link_conflicts,
            self.patches
        )
    }
}

/// Main handler for `runprep prepare`.
pub fn handle_prepare(args: PrepareArgs) -> Result<()> {
    let cfg = config::load_config()?;
    let manifest_path = args
        .manifest
        .unwrap_or_else(|| cfg.prepare.manifest_path());
    let options = effective_options(cfg.links.link_options(), args.no_lustre_check);

    let summary = prepare_run(&manifest_path, &options)?;
    println!("Prepared run from {}: {}", manifest_path.display(), summary);
    Ok(())
}

/// Loads the manifest at `manifest_path` and applies it relative to the
/// manifest's directory.
pub fn prepare_run(manifest_path: &Path, options: &LinkOptions) -> Result<PrepareSummary> {
    info!("Preparing run from manifest {:?}", manifest_path);
    let manifest = Manifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    apply_manifest(&manifest, base, options)
}

/// Applies `manifest` with relative paths resolved against `base`.
pub fn apply_manifest(
    manifest: &Manifest,
    base: &Path,
    options: &LinkOptions,
) -> Result<PrepareSummary> {
    let mut summary = PrepareSummary::default();

    for raw in &manifest.directories {
        let path = resolve_path(base, raw);
        ensure_directory(&path)
            .with_context(|| format!("Failed to ensure directory {}", path.display()))?;
        summary.directories += 1;
    }

    for entry in &manifest.links {
        let source = PathBuf::from(shellexpand::tilde(&entry.source).into_owned());
        let link = resolve_path(base, &entry.link);
        let outcome = ensure_symlink(&source, &link, options).with_context(|| {
            format!("Failed to link {} -> {}", link.display(), source.display())
        })?;
        debug!("Link {:?}: {}", link, outcome);
        summary.record_link(outcome);
    }

    for entry in &manifest.patches {
        let path = resolve_path(base, &entry.path);
        let replacement = as_line(&entry.replacement, entry.newline);
        patch_text_file(&path, &entry.pattern, &replacement)
            .with_context(|| format!("Failed to patch {}", path.display()))?;
        summary.patches += 1;
    }

    info!("Run preparation finished: {}", summary);
    Ok(summary)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::{LinkEntry, PatchEntry};
    use std::fs;
    use tempfile::tempdir;

    #[cfg(unix)]
    #[test]
    fn test_prepare_run_applies_in_order_and_is_idempotent() -> Result<()> {
        let dir = tempdir()?;
        let inputs = dir.path().join("inputs");
        fs::create_dir(&inputs)?;
        fs::write(inputs.join("grid.nc"), "grid")?;
        fs::write(inputs.join("input.nml"), "&coupler_nml\n  days = 1\n/\n")?;

        let manifest_path = dir.path().join("manifest.toml");
        fs::write(
            &manifest_path,
            format!(
                r#"
directories = ["work/INPUT"]

[[links]]
source = "{inputs}/grid.nc"
link = "work/INPUT/grid.nc"

[[links]]
source = "{inputs}/input.nml"
link = "work/input.nml"

[[patches]]
path = "inputs/input.nml"
pattern = '\s*days'
replacement = "  days = 31"
"#,
                inputs = inputs.display()
            ),
        )?;

        let first = prepare_run(&manifest_path, &LinkOptions::default())?;
        assert_eq!(first.directories, 1);
        assert_eq!(first.links_created, 2);
        assert_eq!(first.patches, 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("work/INPUT/grid.nc"))?,
            "grid"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("work/input.nml"))?,
            "&coupler_nml\n  days = 31\n/\n"
        );

        let second = prepare_run(&manifest_path, &LinkOptions::default())?;
        assert_eq!(second.links_created, 0);
        assert_eq!(second.links_unchanged, 2);
        assert_eq!(
            fs::read_to_string(inputs.join("input.nml"))?,
            "&coupler_nml\n  days = 31\n/\n"
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_manifest_counts_conflicts() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("occupied"), "keep me")?;
        let manifest = Manifest {
            links: vec![LinkEntry {
                source: "/nonexistent/source".into(),
                link: "occupied".into(),
            }],
            ..Default::default()
        };

        let summary = apply_manifest(&manifest, dir.path(), &LinkOptions::default())?;
        assert_eq!(summary.link_conflicts, 1);
        assert_eq!(fs::read_to_string(dir.path().join("occupied"))?, "keep me");
        Ok(())
    }

    #[test]
    fn test_apply_manifest_skips_missing_patch_target() -> Result<()> {
        let dir = tempdir()?;
        let manifest = Manifest {
            patches: vec![PatchEntry {
                path: "absent.nml".into(),
                pattern: "days".into(),
                replacement: "days = 2".into(),
                newline: true,
            }],
            ..Default::default()
        };

        let summary = apply_manifest(&manifest, dir.path(), &LinkOptions::default())?;
        assert_eq!(summary.patches, 1);
        assert!(!dir.path().join("absent.nml").exists());
        Ok(())
    }

    #[test]
    fn test_apply_manifest_stops_on_directory_error() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("blocker"), "")?;
        let manifest = Manifest {
            directories: vec!["blocker/child".into(), "never".into()],
            ..Default::default()
        };

        let err = apply_manifest(&manifest, dir.path(), &LinkOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to ensure directory"));
        assert!(!dir.path().join("never").exists());
        Ok(())
    }

    #[test]
    fn test_summary_display() {
        let summary = PrepareSummary {
            directories: 2,
            links_created: 1,
            patches: 3,
            ..Default::default()
        };
        assert_eq!(
            summary.to_string(),
            "2 directories, links: 1 created, 0 unchanged, 0 replaced, 0 conflicts, 3 patches"
        );
    }
}
