//! # runprep CLI Filesystem Command Integration Tests
//!
//! File: cli/tests/fsops.rs
//!
//! ## Overview
//!
//! Integration tests for `runprep mkdir`, `runprep link` and `runprep patch`,
//! run against real temporary directories.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_mkdir_twice_succeeds() {
    let dir = tempdir().unwrap();
    for _ in 0..2 {
        runprep_in(dir.path())
            .args(["mkdir", "work/INPUT", "archive"])
            .assert()
            .success();
    }
    assert!(dir.path().join("work/INPUT").is_dir());
    assert!(dir.path().join("archive").is_dir());
}

#[test]
fn test_mkdir_through_file_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("work"), "").unwrap();
    runprep_in(dir.path())
        .args(["mkdir", "work/INPUT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to ensure directory"));
}

#[cfg(unix)]
#[test]
fn test_link_create_then_unchanged() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("grid.nc"), "grid").unwrap();

    runprep_in(dir.path())
        .args(["link", "grid.nc", "grid.link"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(created)"));
    runprep_in(dir.path())
        .args(["link", "grid.nc", "grid.link"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(unchanged)"));

    assert_eq!(
        fs::read_link(dir.path().join("grid.link")).unwrap(),
        std::path::PathBuf::from("grid.nc")
    );
}

#[cfg(unix)]
#[test]
fn test_link_repoints_existing_link() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("restart000"), "old").unwrap();
    fs::write(dir.path().join("restart001"), "new").unwrap();
    std::os::unix::fs::symlink("restart000", dir.path().join("restart")).unwrap();

    runprep_in(dir.path())
        .args(["link", "restart001", "restart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(replaced)"));
    assert_eq!(
        fs::read_to_string(dir.path().join("restart")).unwrap(),
        "new"
    );
}

#[cfg(unix)]
#[test]
fn test_link_onto_regular_file_warns_and_succeeds() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("grid.nc"), "grid").unwrap();
    fs::write(dir.path().join("grid.link"), "precious").unwrap();

    runprep_in(dir.path())
        .args(["link", "grid.nc", "grid.link"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(conflict)"))
        .stderr(predicate::str::contains("already exists"));
    assert_eq!(
        fs::read_to_string(dir.path().join("grid.link")).unwrap(),
        "precious"
    );
}

#[test]
fn test_patch_rewrites_matching_line() {
    let dir = tempdir().unwrap();
    let nml = dir.path().join("input.nml");
    fs::write(&nml, "&meta\nTITLE=old\nauthor = 'me'\n/\n").unwrap();

    runprep_in(dir.path())
        .args(["patch", "input.nml", "^TITLE", "TITLE = 'x'"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&nml).unwrap(),
        "&meta\nTITLE = 'x'\nauthor = 'me'\n/\n"
    );
    assert!(!dir.path().join("input.nml~").exists());
}

#[test]
fn test_patch_missing_file_is_noop() {
    let dir = tempdir().unwrap();
    runprep_in(dir.path())
        .args(["patch", "absent.nml", "days", "days = 1"])
        .assert()
        .success();
    assert!(!dir.path().join("absent.nml").exists());
}

#[test]
fn test_patch_invalid_pattern_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("input.nml"), "days = 1\n").unwrap();
    runprep_in(dir.path())
        .args(["patch", "input.nml", "days[", "days = 2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
}
