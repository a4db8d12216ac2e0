//! # runprep Text File Patching
//!
//! File: cli/src/common/fs/patch.rs
//!
//! ## Overview
//!
//! Model configuration files (Fortran namelists and the like) are adjusted
//! per run by replacing whole lines. `patch_text_file` rewrites every line
//! whose beginning matches a case-insensitive pattern with a replacement
//! string, leaving the rest of the file byte-for-byte intact.
//!
//! ## Architecture
//!
//! - The pattern is anchored at the start of each line (`^(?:pattern)`), so a
//!   prefix match is enough to replace the entire line. Line terminators are
//!   not part of the matched text.
//! - The replacement is written verbatim and supplies its own terminator.
//! - Output goes to `<path>~` in the same directory and is renamed over the
//!   original once complete, keeping the original permission bits.
//! - The temporary file is owned by a guard that deletes it unless the rename
//!   happened, so a failed patch leaves only the untouched original.
//! - A missing target file is not an error: nothing happens.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use runprep::common::fs::patch::patch_text_file;
//! use std::path::Path;
//!
//! # fn run_example() -> Result<(), runprep::core::error::PatchError> {
//! patch_text_file(Path::new("work/input.nml"), r"\s*restart", "restart = .true.\n")?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{FsErrorKind, FsOpError, PatchError};
use regex::bytes::{Regex, RegexBuilder};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Marker appended to the target path to name the temporary output file.
pub const TEMP_SUFFIX: &str = "~";

/// Returns the temporary file path used while patching `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Compiles `pattern` as a case-insensitive, start-of-line-anchored regex.
///
/// `pattern` must be a valid regex on its own; it is checked before being
/// wrapped in the anchoring group so that unbalanced groups cannot escape it.
pub fn compile_line_pattern(pattern: &str) -> Result<Regex, PatchError> {
    let invalid = |source| PatchError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(invalid)?;
    RegexBuilder::new(&format!("^(?:{pattern})"))
        .case_insensitive(true)
        .build()
        .map_err(invalid)
}

/// Replaces every line of the file at `path` that starts with a match of
/// `pattern` (case-insensitive) by `replacement`.
///
/// # Errors
///
/// - `PatchError::InvalidPattern` if `pattern` does not compile. The file is
///   not touched.
/// - `PatchError::Io` for any I/O failure other than `path` not existing.
pub fn patch_text_file(path: &Path, pattern: &str, replacement: &str) -> Result<(), PatchError> {
    let regex = compile_line_pattern(pattern)?;

    let input = match File::open(path) {
        Ok(file) => file,
        Err(e) if FsErrorKind::from(e.kind()) == FsErrorKind::NotFound => {
            debug!("Patch target does not exist, skipping: {:?}", path);
            return Ok(());
        }
        Err(e) => return Err(FsOpError::new("open", path, e).into()),
    };
    let permissions = input
        .metadata()
        .map_err(|e| FsOpError::new("read metadata", path, e))?
        .permissions();

    let temp_path = temp_path_for(path);
    let temp = File::create(&temp_path)
        .map_err(|e| FsOpError::new("create temp file", &temp_path, e))?;
    // Declared before the writer so the handle closes before the unlink.
    let guard = TempFileGuard::new(&temp_path);
    let mut writer = BufWriter::new(temp);

    let replaced = rewrite_lines(
        BufReader::new(input),
        &mut writer,
        &regex,
        replacement.as_bytes(),
    )
    .map_err(|e| FsOpError::new("rewrite", path, e))?;

    let temp = writer
        .into_inner()
        .map_err(|e| FsOpError::new("flush temp file", &temp_path, e.into_error()))?;
    temp.sync_all()
        .map_err(|e| FsOpError::new("sync temp file", &temp_path, e))?;
    temp.set_permissions(permissions)
        .map_err(|e| FsOpError::new("set permissions", &temp_path, e))?;
    drop(temp);

    fs::rename(&temp_path, path).map_err(|e| FsOpError::new("rename", path, e))?;
    guard.disarm();

    info!(
        "Patched {:?}: {} line(s) matching '{}' replaced",
        path, replaced, pattern
    );
    Ok(())
}

/// Copies `reader` to `writer` line by line, substituting matching lines.
/// Returns the number of lines replaced.
fn rewrite_lines<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    regex: &Regex,
    replacement: &[u8],
) -> io::Result<usize> {
    let mut line = Vec::new();
    let mut replaced = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if regex.is_match(strip_terminator(&line)) {
            writer.write_all(replacement)?;
            replaced += 1;
        } else {
            writer.write_all(&line)?;
        }
    }
    Ok(replaced)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Removes the temporary file on drop unless `disarm` was called.
struct TempFileGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> TempFileGuard<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = fs::remove_file(self.path) {
            debug!("Could not remove temp file {:?}: {}", self.path, e);
        }
    }
}
