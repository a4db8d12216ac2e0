//! # runprep Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!

//! ## Overview
//!
//! The three idempotent operations used to prepare a run directory. Each is a
//! single, independent call with no shared state; running a setup twice must
//! leave the same filesystem as running it once.
//!
//! ## Architecture
//!
//! - **`io`**: `ensure_directory`, the `mkdir -p` contract.
//! - **`links`**: `ensure_symlink`, create or repoint a symbolic link, with
//!   the Lustre 60-character path workaround and a warning (not an error) when
//!   a regular file is in the way.
//! - **`patch`**: `patch_text_file`, replace whole lines matching a
//!   case-insensitive prefix pattern through a temp file and atomic rename.
//!
//! Benign conditions ("already exists", "not found" for the patch target) are
//! swallowed by matching `FsErrorKind`; everything else propagates as
//! `FsOpError`.
//!
//! None of these functions synchronise concurrent callers working on the
//! same paths; callers that race on a run directory must serialise themselves.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use runprep::common::fs::{io, links, patch};
//! use std::path::Path;
//!
//! # fn run_example() -> anyhow::Result<()> {
//! io::ensure_directory(Path::new("work/INPUT"))?;
//! links::ensure_symlink(
//!     Path::new("/scratch/restart000/ocean.res.nc"),
//!     Path::new("work/INPUT/ocean.res.nc"),
//!     &links::LinkOptions::default(),
//! )?;
//! patch::patch_text_file(Path::new("work/input.nml"), "days", "days = 31\n")?;
//! # Ok(())
//! # }
//! ```
//!

/// Directory creation (`ensure_directory`).
pub mod io;
/// Symbolic link management (`ensure_symlink`, `LinkOptions`, `Symlinker`).
pub mod links;
/// Line-pattern substitution in text files (`patch_text_file`).
pub mod patch;
