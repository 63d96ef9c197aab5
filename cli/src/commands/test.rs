//! # BldRS Test Command
//!
//! File: cli/src/commands/test.rs
//!
//! ## Overview
//!
//! This module implements the `bldrs test` command: tests-only mode. The
//! generate and build steps are skipped entirely; `ctest` runs against the
//! existing build tree in the output directory, with the combined output
//! streamed to `<output>/testsOutput.txt`, and the coverage report follows a
//! successful run when coverage was requested.
//!
//! ## Examples
//!
//! ```bash
//! # Run tests against ./output
//! bldrs test
//!
//! # Run a filtered subset with coverage
//! bldrs test --gtest-filter 'Parser.*' --coverage
//! ```
//!
use crate::commands::{self, PipelineArgs};
use crate::core::config::PipelineMode;
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// # Test Arguments (`TestArgs`)
///
/// Defines the command-line arguments accepted by the `bldrs test`
/// subcommand: the full shared option catalog (generation options are
/// accepted for symmetry but unused in this mode).
#[derive(Parser, Debug)]
#[command(
    about = "Run tests against an existing build tree (skips generate and build)",
    long_about = "Runs ctest in the output directory without generating or building\n\
                  first. The combined test output is streamed to\n\
                  <output>/testsOutput.txt. With --coverage, a coverage report\n\
                  follows a successful run."
)]
pub struct TestArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
}

/// # Handle Test Command (`handle_test`)
///
/// Assemble the configuration in tests-only mode and execute it.
pub fn handle_test(args: TestArgs) -> Result<()> {
    debug!("Test args: {:?}", args);
    let cfg = args.pipeline.into_config(PipelineMode::TestsOnly)?;
    commands::execute(&cfg)
}
