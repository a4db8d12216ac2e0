//! # runprep Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!

//! ## Overview
//!
//! Shared utilities used by the command handlers and by external orchestration
//! code linking against the `runprep` library. Currently this is the
//! filesystem layer only:
//!
//! - **`fs`**: idempotent directory creation, symbolic link management and
//!   in-place text patching. Includes `io`, `links`, `patch`.
//!

/// Utilities for filesystem operations (directories, links, text patching).
pub mod fs;
