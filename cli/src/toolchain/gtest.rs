//! # BldRS GoogleTest Translator (`toolchain::gtest`)
//!
//! File: cli/src/toolchain/gtest.rs
//!
//! ## Overview
//!
//! Translates GoogleTest runtime options into the `GTEST_*` CMake cache
//! definitions consumed by the generated build scripts. Every option is
//! optional; with nothing set this translator contributes no flags at all,
//! leaving GoogleTest's own defaults in charge.
//!
//! Each definition follows the uniform `-D<NAME>=<value>` pattern; boolean
//! options become `1` when enabled and are omitted otherwise.
//!
use crate::core::config::Config;
use clap::{Args, ValueEnum};

/// Colored-output preference handed through to GoogleTest.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GtestColor {
    No,
    Yes,
    Auto,
}

impl GtestColor {
    /// The spelling GoogleTest expects for `GTEST_COLOR`.
    pub fn as_str(&self) -> &'static str {
        match self {
            GtestColor::No => "no",
            GtestColor::Yes => "yes",
            GtestColor::Auto => "auto",
        }
    }
}

/// # GoogleTest Options (`GtestOptions`)
///
/// The GoogleTest option group, flattened into the subcommand argument
/// structs. All fields map one-to-one onto `GTEST_*` cache definitions.
#[derive(Args, Debug, Default, Clone)]
pub struct GtestOptions {
    /// GTest: Filter regex for running test cases.
    #[arg(id = "gtest_filter", long = "gtest-filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// GTest: Use colorful logs.
    #[arg(long = "gtest-color", value_enum)]
    pub color: Option<GtestColor>,

    /// GTest: Run also disabled tests.
    #[arg(long = "gtest-also-run-disabled-tests")]
    pub also_run_disabled: bool,

    /// GTest: Indicate how many times tests shall be run.
    #[arg(long = "gtest-repeat", value_name = "N")]
    pub repeat: Option<u32>,

    /// GTest: Print only failures.
    #[arg(long = "gtest-brief")]
    pub brief: bool,

    /// GTest: Shuffle tests.
    #[arg(long = "gtest-shuffle")]
    pub shuffle: bool,

    /// GTest: Print test execution time.
    #[arg(long = "gtest-print-time")]
    pub print_time: bool,

    /// GTest: Path to output file with details.
    #[arg(id = "gtest_output", long = "gtest-output", value_name = "PATH")]
    pub output: Option<String>,

    /// GTest: Print only test case names.
    #[arg(long = "gtest-list-tests")]
    pub list_tests: bool,

    /// GTest: Stop after the first failure.
    #[arg(long = "gtest-fail-fast")]
    pub fail_fast: bool,

    /// GTest: Print in UTF-8.
    #[arg(long = "gtest-print-utf8")]
    pub print_utf8: bool,

    /// GTest: Seed for shuffling.
    #[arg(long = "gtest-random-seed", value_name = "SEED")]
    pub random_seed: Option<u32>,
}

/// CMake cache definitions for the GoogleTest options set on `cfg`.
/// Deterministic, pure, and empty when nothing is set.
pub fn cmake_defines(cfg: &Config) -> Vec<String> {
    let opts = &cfg.gtest;
    let mut cmake = Vec::new();
    if let Some(filter) = &opts.filter {
        cmake.push(format!("-DGTEST_FILTER={filter}"));
    }
    if let Some(color) = opts.color {
        cmake.push(format!("-DGTEST_COLOR={}", color.as_str()));
    }
    if opts.also_run_disabled {
        cmake.push("-DGTEST_RUN_DISABLED=1".to_string());
    }
    if let Some(repeat) = opts.repeat {
        cmake.push(format!("-DGTEST_REPEAT={repeat}"));
    }
    if opts.brief {
        cmake.push("-DGTEST_BRIEF=1".to_string());
    }
    if opts.shuffle {
        cmake.push("-DGTEST_SHUFFLE=1".to_string());
    }
    if opts.print_time {
        cmake.push("-DGTEST_PRINT_TIME=1".to_string());
    }
    if let Some(output) = &opts.output {
        cmake.push(format!("-DGTEST_OUTPUT={output}"));
    }
    if opts.list_tests {
        cmake.push("-DGTEST_LIST_TESTS=1".to_string());
    }
    if opts.fail_fast {
        cmake.push("-DGTEST_FAIL_FAST=1".to_string());
    }
    if opts.print_utf8 {
        cmake.push("-DGTEST_PRINT_UTF8=1".to_string());
    }
    if let Some(seed) = opts.random_seed {
        cmake.push(format!("-DGTEST_RANDOM_SEED={seed}"));
    }
    cmake
}
