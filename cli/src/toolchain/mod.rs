//! # BldRS Toolchain Translators (`toolchain`)
//!
//! File: cli/src/toolchain/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the option-to-flag translators. Each translator is
//! an independent, stateless component with two responsibilities:
//!
//! 1. Declaring its recognized command-line options as a clap `Args` group
//!    (flattened into the subcommand argument structs) — option names,
//!    defaults, and allowed-value sets in one place.
//! 2. Converting the parsed configuration record into the CMake cache
//!    definitions its toolchain component understands, via a deterministic
//!    `cmake_defines` function.
//!
//! Translators only read their own fields of the configuration record and
//! tolerate every other translator being fully disabled. A translator whose
//! options are all unset produces an empty flag list. The single permitted
//! side effect is the coverage translator creating its report directory when
//! it defaults the output path.
//!
//! The coverage and benchmark translators additionally own their post-test
//! report hooks (`gcovr`, running the benchmark executables), since those
//! invocations are pure functions of the same option groups.
//!
//! ## Translators
//!
//! - `gtest`: GoogleTest runtime options (`GTEST_*` cache definitions)
//! - `sanitizer`: memory/UB tooling selection (`ADD_TARGET_*` definitions)
//! - `coverage`: gcov/gcovr coverage collection and report generation
//! - `benchmark`: Google Benchmark enablement and report generation
//!

/// Google Benchmark options and the benchmark-report step.
pub mod benchmark;
/// Gcov/gcovr coverage options and the coverage-report step.
pub mod coverage;
/// GoogleTest runtime options.
pub mod gtest;
/// Sanitizer selection (valgrind, Dr. Memory, clang sanitizers).
pub mod sanitizer;

use std::path::Path;

/// Render a path the way CMake wants it on every platform: forward slashes.
pub(crate) fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
