//! # runprep Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for runprep, handling
//! loading, merging, validation, and access to configuration data. It combines
//! built-in defaults, user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.runprep.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `<config dir>/runprep/config.toml`
//! 3. Default values defined in the code
//!
//! A value set explicitly in a file always overrides the sources below it,
//! even when it equals the default. A relative `prepare.manifest` is resolved
//! against the directory of the file that set it.
//!
//! ```toml
//! [links]
//! check_lustre_path_len = true
//!
//! [prepare]
//! manifest = "~/runs/ocean/runprep-manifest.toml"
//! ```
//!
//! ## Examples
//!
//! ```rust,no_run
//! let cfg = runprep::core::config::load_config()?;
//! let options = cfg.links.link_options();
//! let manifest_path = cfg.prepare.manifest_path();
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
use crate::common::fs::links::LinkOptions;
use crate::core::error::{Result, RunprepError};
use crate::core::manifest::resolve_path;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
///
/// Every setting is optional in the file; an unset value falls back to the
/// next source and finally to the built-in default.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub prepare: PrepareConfig,
}

/// Settings for symbolic link creation (`runprep link`, `runprep prepare`).
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinksConfig {
    /// Work around the Lustre 60-character symlink path bug (default: on).
    #[serde(default)]
    pub check_lustre_path_len: Option<bool>,
}

impl LinksConfig {
    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            check_lustre_path_len: self
                .check_lustre_path_len
                .unwrap_or(DEFAULT_CHECK_LUSTRE_PATH_LEN),
        }
    }
}

/// Settings for `runprep prepare`.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PrepareConfig {
    /// Manifest used when none is given on the command line (can use ~).
    /// Relative values are relative to the file that set them.
    #[serde(default)]
    pub manifest: Option<String>,
    /// Directory of the configuration file `manifest` was read from.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl PrepareConfig {
    /// The manifest path to use, `~`-expanded and resolved against the
    /// directory of the configuration file that named it.
    pub fn manifest_path(&self) -> PathBuf {
        match (&self.manifest, &self.base_dir) {
            (Some(raw), Some(base)) => resolve_path(base, raw),
            (Some(raw), None) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
            (None, _) => PathBuf::from(DEFAULT_MANIFEST),
        }
    }
}

const DEFAULT_CHECK_LUSTRE_PATH_LEN: bool = true;
const DEFAULT_MANIFEST: &str = "runprep-manifest.toml";
const PROJECT_CONFIG_FILENAME: &str = ".runprep.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "runprep") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.runprep.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    config.prepare.base_dir = path.parent().map(Path::to_path_buf);
    Ok(config)
}

/// Explicit project values win over user values, which win over defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    Config {
        links: LinksConfig {
            check_lustre_path_len: project_cfg
                .links
                .check_lustre_path_len
                .or(user.links.check_lustre_path_len),
        },
        // The manifest travels with the directory of the file that set it.
        prepare: if project_cfg.prepare.manifest.is_some() {
            project_cfg.prepare
        } else {
            user.prepare
        },
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(manifest) = &config.prepare.manifest {
        if manifest.trim().is_empty() {
            return Err(anyhow!(RunprepError::Config(
                "prepare.manifest cannot be empty.".to_string()
            )));
        }
    }
    Ok(())
}
