//! # runprep Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout runprep. There are two
//! layers:
//!
//! - **Library errors** returned by the filesystem helpers in `common::fs`:
//!   - `FsOpError`: a failed filesystem call, carrying the operation name, the
//!     path involved, and the untouched `std::io::Error` as its source.
//!   - `PatchError`: either an invalid regex pattern or an `FsOpError`.
//! - **Application errors** used by commands and config loading:
//!   - `RunprepError`: a `thiserror` enum for configuration/manifest problems.
//!   - `Result<T>`: an alias for `anyhow::Result<T>` so commands can attach context.
//!
//! Benign conditions are recognised by `FsErrorKind`, a small discriminant
//! derived from `std::io::ErrorKind`, never by raw errno values.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use runprep::common::fs::io::ensure_directory;
//! use runprep::core::error::FsErrorKind;
//! use std::path::Path;
//!
//! match ensure_directory(Path::new("/proc/not-allowed")) {
//!     Ok(()) => {}
//!     Err(e) if e.kind() == FsErrorKind::PermissionDenied => eprintln!("no access: {e}"),
//!     Err(e) => eprintln!("other failure: {e}"),
//! }
//! ```
//!
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Coarse classification of a filesystem failure.
///
/// Only `AlreadyExists` and `NotFound` are ever swallowed, and only by the
/// operation that expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    AlreadyExists,
    NotFound,
    PermissionDenied,
    Other,
}

impl From<io::ErrorKind> for FsErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::AlreadyExists => FsErrorKind::AlreadyExists,
            io::ErrorKind::NotFound => FsErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FsErrorKind::PermissionDenied,
            _ => FsErrorKind::Other,
        }
    }
}

/// A filesystem call that failed, with the OS error preserved as `source`.
#[derive(Error, Debug)]
#[error("{op} failed for {path:?}: {source}")]
pub struct FsOpError {
    /// Short name of the failing operation (e.g. "create directory").
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl FsOpError {
    pub fn new(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> FsErrorKind {
        self.source.kind().into()
    }
}

/// Failure of `patch_text_file`.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Io(#[from] FsOpError),
}

/// Application-level error type for commands and configuration.
#[derive(Error, Debug)]
pub enum RunprepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
