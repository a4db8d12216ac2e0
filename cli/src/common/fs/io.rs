//! # runprep Directory Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Idempotent directory creation used when laying out run directories
//! (work, archive, input subdirectories). This is the `mkdir -p` contract:
//! missing ancestors are created, an existing directory is left alone, and
//! every other failure reaches the caller with its OS error intact.
//!
//! ## Usage
//!
//! ```rust
//! use runprep::common::fs::io;
//! use std::path::Path;
//!
//! # fn run_example() -> Result<(), runprep::core::error::FsOpError> {
//! io::ensure_directory(Path::new("./work/INPUT"))?;
//! io::ensure_directory(Path::new("./work/INPUT"))?; // no-op
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{FsErrorKind, FsOpError};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at `path`, creating missing ancestors.
///
/// # Errors
///
/// Returns an `FsOpError` if creation fails for any reason other than the
/// directory already existing. A non-directory already occupying `path`
/// is reported with kind `AlreadyExists`.
pub fn ensure_directory(path: &Path) -> Result<(), FsOpError> {
    if path.is_dir() {
        debug!("Directory already exists: {:?}", path);
        return Ok(());
    }

    match fs::create_dir_all(path) {
        Ok(()) => {
            info!("Created directory: {:?}", path);
            Ok(())
        }
        Err(e) => {
            let err = FsOpError::new("create directory", path, e);
            // Lost a race with another creator; fine as long as it is a directory.
            if err.kind() == FsErrorKind::AlreadyExists && path.is_dir() {
                debug!("Directory appeared concurrently: {:?}", path);
                return Ok(());
            }
            Err(err)
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Test `ensure_directory` when the directory needs to be created, including parents.
    #[test]
    fn test_ensure_directory_creates_new() -> anyhow::Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_directory(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    /// Calling twice is a no-op success the second time.
    #[test]
    fn test_ensure_directory_is_idempotent() -> anyhow::Result<()> {
        let base_dir = tempdir()?;
        let dir = base_dir.path().join("work");
        ensure_directory(&dir)?;
        fs::write(dir.join("marker"), "keep")?;
        ensure_directory(&dir)?;
        assert!(dir.is_dir());
        assert_eq!(fs::read_to_string(dir.join("marker"))?, "keep");
        Ok(())
    }

    /// A file occupying the path is not a directory; the error propagates.
    #[test]
    fn test_ensure_directory_path_is_file() -> anyhow::Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let err = ensure_directory(&file_path).unwrap_err();
        assert_eq!(err.kind(), FsErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&file_path)?, "hello");
        Ok(())
    }

    /// A file in the middle of the path makes creation fail.
    #[test]
    fn test_ensure_directory_through_file_fails() -> anyhow::Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("blocker");
        fs::write(&file_path, "")?;
        assert!(ensure_directory(&file_path.join("child")).is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_directory_permission_denied() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let base_dir = tempdir()?;
        let readonly = base_dir.path().join("readonly");
        fs::create_dir(&readonly)?;
        fs::set_permissions(&readonly, fs::Permissions::from_mode(0o555))?;

        // Privileged users bypass permission bits; nothing to check then.
        let canary = readonly.join("canary");
        if fs::create_dir(&canary).is_ok() {
            fs::remove_dir(&canary)?;
            fs::set_permissions(&readonly, fs::Permissions::from_mode(0o755))?;
            return Ok(());
        }

        let result = ensure_directory(&readonly.join("path"));
        fs::set_permissions(&readonly, fs::Permissions::from_mode(0o755))?;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), FsErrorKind::PermissionDenied);
        Ok(())
    }
}
