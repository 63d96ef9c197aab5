//! # BldRS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! This module provides shared utility functions and re-exports common crates
//! used across multiple integration test files. This avoids code duplication
//! in the test suite.
//!
//! Integration tests are located in the `cli/tests/` directory and each `.rs`
//! file in that directory (that isn't a module like this one) is compiled as
//! a separate test crate linked against the main `bldrs` binary crate.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

// Re-export common crates/modules needed by multiple test files
pub use assert_cmd::Command;

/// # Get BldRS Command (`bldrs_cmd`)
///
/// Helper function to create an `assert_cmd::Command` instance pointing to the
/// compiled `bldrs` binary target for the current test run.
///
/// This ensures tests execute the correct binary being built.
///
/// ## Panics
/// Panics if the `bldrs` binary cannot be found via `Command::cargo_bin`.
pub fn bldrs_cmd() -> Command {
    Command::cargo_bin("bldrs").expect("Failed to find bldrs binary for testing")
}
