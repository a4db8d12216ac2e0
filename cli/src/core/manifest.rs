//! # runprep Run Manifests
//!
//! File: cli/src/core/manifest.rs
//!
//! ## Overview
//!
//! A run manifest lists what a run directory needs: directories to create,
//! input links to place, and configuration lines to patch. `runprep prepare`
//! applies it in that order.
//!
//! ```toml
//! directories = ["work/INPUT", "archive"]
//!
//! [[links]]
//! source = "/scratch/inputs/grid_spec.nc"
//! link = "work/INPUT/grid_spec.nc"
//!
//! [[patches]]
//! path = "work/input.nml"
//! pattern = '\s*days'
//! replacement = "    days = 31"
//! ```
//!
//! Relative `directories`, `links[].link` and `patches[].path` are resolved
//! against the manifest's own directory. `links[].source` is kept verbatim
//! because a relative link target is interpreted relative to the link.
//!
use crate::common::fs::patch::compile_line_pattern;
use crate::core::error::{Result, RunprepError};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Parsed run manifest.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub directories: Vec<String>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
    #[serde(default)]
    pub patches: Vec<PatchEntry>,
}

/// One `[[links]]` entry.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkEntry {
    pub source: String,
    pub link: String,
}

/// One `[[patches]]` entry.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatchEntry {
    pub path: String,
    pub pattern: String,
    pub replacement: String,
    /// Append `\n` to `replacement` when it lacks one.
    #[serde(default = "default_newline")]
    pub newline: bool,
}

fn default_newline() -> bool {
    true
}

impl Manifest {
    /// Reads, parses and validates the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest: Manifest = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML from manifest: {}", path.display()))?;
        manifest
            .validate()
            .with_context(|| format!("Invalid manifest: {}", path.display()))?;
        Ok(manifest)
    }

    /// Rejects empty paths and patterns that do not compile, before anything
    /// on disk is changed.
    pub fn validate(&self) -> Result<()> {
        if self.directories.iter().any(|d| d.trim().is_empty()) {
            return Err(anyhow!(RunprepError::Manifest(
                "directories cannot contain an empty path.".to_string()
            )));
        }
        for entry in &self.links {
            if entry.source.is_empty() || entry.link.is_empty() {
                return Err(anyhow!(RunprepError::Manifest(format!(
                    "link entries need both source and link (source: '{}', link: '{}').",
                    entry.source, entry.link
                ))));
            }
        }
        for entry in &self.patches {
            if entry.path.trim().is_empty() {
                return Err(anyhow!(RunprepError::Manifest(format!(
                    "patch entry with pattern '{}' has an empty path.",
                    entry.pattern
                ))));
            }
            compile_line_pattern(&entry.pattern)?;
        }
        Ok(())
    }
}

/// Expands `~` in `raw` and resolves it against `base` when relative.
pub fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
