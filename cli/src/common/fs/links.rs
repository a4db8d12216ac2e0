//! # runprep Symbolic Link Operations
//!
//! File: cli/src/common/fs/links.rs
//!
//! ## Overview
//!
//! Run directories reference their inputs (grids, restarts, executables)
//! through symbolic links. `ensure_symlink` makes sure a link exists and
//! points at the requested source, and is safe to call on every setup pass.
//!
//! ## Architecture
//!
//! - **Lustre path-length workaround:** Lustre corrupts symlink paths that are
//!   exactly 60 characters long. When `LinkOptions::check_lustre_path_len` is
//!   set, a 60-character source or link path is lengthened with a no-op prefix
//!   (`/.` for absolute paths, `./` for relative ones) before it reaches the
//!   syscall. Each path is corrected independently.
//! - **Existing link handling:**
//!     - A non-link (file or directory) at the link path is left untouched and
//!       a warning is logged. This is not an error.
//!     - A link already resolving to the source is left untouched.
//!     - A link resolving anywhere else is replaced atomically: the new link
//!       is created next to it under a staging name and renamed over it, so
//!       `link` never disappears and a failed create keeps the old link.
//! - **Syscall seam:** the actual link creation goes through the `Symlinker`
//!   trait so callers and tests can observe the exact arguments passed.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use runprep::common::fs::links::{ensure_symlink, LinkOptions};
//! use std::path::Path;
//!
//! # fn run_example() -> Result<(), runprep::core::error::FsOpError> {
//! let outcome = ensure_symlink(
//!     Path::new("/scratch/inputs/grid_spec.nc"),
//!     Path::new("work/INPUT/grid_spec.nc"),
//!     &LinkOptions::default(),
//! )?;
//! println!("grid_spec.nc: {outcome}");
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{FsErrorKind, FsOpError};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Path length (in characters) that Lustre mangles in symlinks.
pub const LUSTRE_BAD_PATH_LEN: usize = 60;

/// Suffix of the sibling name a replacement link is created under.
pub const STAGING_SUFFIX: &str = ".runprep-new";

/// Options controlling `ensure_symlink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOptions {
    /// Rewrite 60-character paths to dodge the Lustre symlink bug.
    pub check_lustre_path_len: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            check_lustre_path_len: true,
        }
    }
}

/// What `ensure_symlink` did to reach its post-condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// No entry existed; a new link was created.
    Created,
    /// The existing link already resolved to the source.
    Unchanged,
    /// An existing link to a different target was replaced.
    Replaced,
    /// A non-link occupies the link path and was left alone.
    Conflict,
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LinkOutcome::Created => "created",
            LinkOutcome::Unchanged => "unchanged",
            LinkOutcome::Replaced => "replaced",
            LinkOutcome::Conflict => "conflict",
        };
        f.write_str(text)
    }
}

/// The underlying "create a symbolic link" call.
pub trait Symlinker {
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()>;
}

/// Creates real links through the platform API.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSymlinker;

impl Symlinker for OsSymlinker {
    #[cfg(unix)]
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(source, link)
    }

    #[cfg(windows)]
    fn symlink(&self, source: &Path, link: &Path) -> io::Result<()> {
        // Windows requires different functions for file vs. directory links.
        let resolved = match link.parent() {
            Some(parent) => parent.join(source),
            None => source.to_path_buf(),
        };
        if resolved.is_dir() {
            std::os::windows::fs::symlink_dir(source, link)
        } else {
            std::os::windows::fs::symlink_file(source, link)
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn symlink(&self, _source: &Path, _link: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symbolic links are not supported on this platform",
        ))
    }
}

/// Returns `path` lengthened by a no-op prefix if it is exactly
/// `LUSTRE_BAD_PATH_LEN` characters long, otherwise `path` unchanged.
pub fn lustre_safe_path(path: &Path) -> PathBuf {
    if path.as_os_str().to_string_lossy().chars().count() != LUSTRE_BAD_PATH_LEN {
        return path.to_path_buf();
    }
    let mut prefixed = OsString::from(if path.is_absolute() { "/." } else { "./" });
    prefixed.push(path.as_os_str());
    PathBuf::from(prefixed)
}

/// Returns the sibling path a replacement for `link` is staged at.
pub fn staging_path_for(link: &Path) -> PathBuf {
    let mut name = OsString::from(link.as_os_str());
    name.push(STAGING_SUFFIX);
    PathBuf::from(name)
}

/// Ensures `link` is a symbolic link pointing at `source`, using the OS.
///
/// See `ensure_symlink_with` for the full contract.
pub fn ensure_symlink(
    source: &Path,
    link: &Path,
    options: &LinkOptions,
) -> Result<LinkOutcome, FsOpError> {
    ensure_symlink_with(&OsSymlinker, source, link, options)
}

/// Ensures `link` is a symbolic link pointing at `source`, creating links
/// through `linker`.
///
/// # Returns
///
/// The `LinkOutcome` describing what happened. `LinkOutcome::Conflict` is
/// a successful return: the entry at `link` is not a link and was kept.
///
/// # Errors
///
/// Returns an `FsOpError` when link creation fails for any reason other
/// than the link path already existing (missing parent directory,
/// permissions), or when an existing link cannot be inspected or removed.
pub fn ensure_symlink_with(
    linker: &dyn Symlinker,
    source: &Path,
    link: &Path,
    options: &LinkOptions,
) -> Result<LinkOutcome, FsOpError> {
    let corrected = |path: &Path| {
        if options.check_lustre_path_len {
            lustre_safe_path(path)
        } else {
            path.to_path_buf()
        }
    };
    let source_arg = corrected(source);
    let link_arg = corrected(link);

    match linker.symlink(&source_arg, &link_arg) {
        Ok(()) => {
            info!("Created symlink: {:?} -> {:?}", link, source);
            return Ok(LinkOutcome::Created);
        }
        Err(e) if FsErrorKind::from(e.kind()) == FsErrorKind::AlreadyExists => {}
        Err(e) => return Err(FsOpError::new("create symlink", link, e)),
    }

    let metadata =
        fs::symlink_metadata(link).map_err(|e| FsOpError::new("inspect link", link, e))?;
    if !metadata.file_type().is_symlink() {
        warn!(
            "Cannot create symbolic link to {:?}; a file named {:?} already exists.",
            source, link
        );
        return Ok(LinkOutcome::Conflict);
    }

    if link_resolves_to(link, source) {
        debug!("Symlink already exists and is correct: {:?}", link);
        return Ok(LinkOutcome::Unchanged);
    }

    let staging = staging_path_for(link);
    clear_staging(&staging)?;
    let staging_arg = corrected(&staging);
    linker
        .symlink(&source_arg, &staging_arg)
        .map_err(|e| FsOpError::new("create symlink", &staging, e))?;
    if let Err(e) = fs::rename(&staging_arg, &link_arg) {
        if let Err(cleanup) = fs::remove_file(&staging) {
            debug!("Could not remove staging link {:?}: {}", staging, cleanup);
        }
        return Err(FsOpError::new("replace symlink", link, e));
    }
    info!("Replaced symlink: {:?} -> {:?}", link, source);
    Ok(LinkOutcome::Replaced)
}

/// Removes a staging link left behind by an interrupted replacement.
/// Anything other than a link at that name is an error.
fn clear_staging(staging: &Path) -> Result<(), FsOpError> {
    match fs::symlink_metadata(staging) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            debug!("Removing leftover staging link {:?}", staging);
            fs::remove_file(staging).map_err(|e| FsOpError::new("remove staging link", staging, e))
        }
        Ok(_) => Err(FsOpError::new(
            "create staging link",
            staging,
            io::Error::from(io::ErrorKind::AlreadyExists),
        )),
        Err(e) if FsErrorKind::from(e.kind()) == FsErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsOpError::new("inspect staging link", staging, e)),
    }
}

/// Whether the existing link at `link` resolves to the same place a new
/// link to `source` would.
fn link_resolves_to(link: &Path, source: &Path) -> bool {
    let existing = match fs::read_link(link) {
        Ok(target) => target,
        Err(_) => return false,
    };
    if existing == source {
        return true;
    }

    // Relative link targets resolve against the directory holding the link.
    let link_parent = link.parent().unwrap_or_else(|| Path::new("."));
    let resolve = |target: &Path| {
        let joined = link_parent.join(target);
        joined.canonicalize().unwrap_or(joined)
    };
    let canonical_existing = resolve(&existing);
    let canonical_source = resolve(source);
    debug!(
        "Canonical source: {:?}, canonical existing target: {:?}",
        canonical_source, canonical_existing
    );
    canonical_existing == canonical_source
}
