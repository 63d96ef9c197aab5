//! # BldRS CLI Pipeline Integration Tests
//!
//! File: cli/tests/pipeline.rs
//!
//! ## Overview
//!
//! Integration tests exercising the pipeline commands end-to-end through the
//! compiled binary, without requiring CMake, ctest or gcovr to be installed:
//! the scenarios here stop at configuration validation, at the working
//! directory check, or run the benchmark no-op path.
//!

// Declare and use the common module
mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

/// # Test Build Rejects Missing Input (`test_build_rejects_missing_input`)
///
/// `bldrs build` with a nonexistent input directory must fail during
/// validation, before any external tool is invoked.
#[test]
fn test_build_rejects_missing_input() {
    let dir = tempdir().unwrap();
    bldrs_cmd()
        .current_dir(dir.path())
        .args(["build", "--input", "/definitely/not/a/real/input/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input directory"));
}

/// # Test Tests-Only Mode Needs a Build Tree (`test_tests_only_needs_build_tree`)
///
/// `bldrs test` runs ctest inside the output directory; when that directory
/// does not exist the run must fail at the working-directory check, before
/// any child process is spawned.
#[test]
fn test_tests_only_needs_build_tree() {
    let dir = tempdir().unwrap();
    bldrs_cmd()
        .current_dir(dir.path())
        .args(["test", "--output", "missing_output"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Working directory"));
}

/// # Test Bench With Nothing Built (`test_bench_with_nothing_built`)
///
/// `bldrs bench` against an output directory without a benchmark list is a
/// successful no-op: nothing was built with benchmarks enabled, so there is
/// nothing to report and nothing to fail on.
#[test]
fn test_bench_with_nothing_built() {
    let dir = tempdir().unwrap();
    bldrs_cmd()
        .current_dir(dir.path())
        .args(["bench", "--output", "."])
        .assert()
        .success();
}

/// # Test Project Defaults File Is Honored (`test_project_defaults_file_is_honored`)
///
/// A `.bldrs.toml` found in the working directory supplies defaults: with no
/// `--output` flag, the output directory comes from the file. The resolved
/// path surfaces in the working-directory error, so no build tree is needed.
#[test]
fn test_project_defaults_file_is_honored() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join(".bldrs.toml"),
        "[defaults]\noutput = \"proj_build\"\n",
    )
    .unwrap();
    bldrs_cmd()
        .current_dir(dir.path())
        .arg("test")
        .assert()
        .failure()
        .stderr(predicate::str::contains("proj_build"));
}

/// # Test CLI Flag Wins Over Project Defaults (`test_cli_flag_wins_over_project_defaults`)
///
/// An explicit `--output` beats the value in `.bldrs.toml`: the resolved
/// directory is the flag's, and the file's value appears nowhere.
#[test]
fn test_cli_flag_wins_over_project_defaults() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join(".bldrs.toml"),
        "[defaults]\noutput = \"proj_build\"\n",
    )
    .unwrap();
    bldrs_cmd()
        .current_dir(dir.path())
        .args(["test", "--output", "cli_build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cli_build"))
        .stderr(predicate::str::contains("proj_build").not());
}

/// # Test Sanitizer Platform Validation (`test_sanitizer_platform_validation`)
///
/// Dr. Memory is Windows-only; selecting it on a POSIX host is a
/// configuration error reported before the pipeline starts.
#[cfg(unix)]
#[test]
fn test_sanitizer_platform_validation() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join("code")).unwrap();
    bldrs_cmd()
        .current_dir(dir.path())
        .args(["build", "--sanitizer", "dr-memory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not available on this platform"));
}

/// # Test Log File Is Created (`test_log_file_is_created`)
///
/// `--log-file` mirrors the log into the given path even when the command
/// itself fails validation.
#[test]
fn test_log_file_is_created() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("run.log");
    bldrs_cmd()
        .current_dir(dir.path())
        .args([
            "--log-file",
            log_path.to_str().unwrap(),
            "build",
            "--input",
            "/definitely/not/a/real/input/dir",
        ])
        .assert()
        .failure();
    assert!(log_path.exists());
}
