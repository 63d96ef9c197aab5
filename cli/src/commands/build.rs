//! # BldRS Build Command
//!
//! File: cli/src/commands/build.rs
//!
//! ## Overview
//!
//! This module implements the `bldrs build` command: the full pipeline.
//! CMake generates the build scripts in the output directory, the project is
//! built, and — when requested — tests run with coverage and benchmark
//! reports following. The pipeline is fail-fast: the first step that exits
//! non-zero aborts the rest.
//!
//! ## Examples
//!
//! ```bash
//! # Debug build of ./code into ./output
//! bldrs build
//!
//! # Release build with Ninja, then run tests
//! bldrs build -p release -g Ninja --with-tests
//!
//! # Configure only, with extra cache definitions
//! bldrs build --generate-only -D FOO=1 -D BAR=baz
//! ```
//!
use crate::commands::{self, PipelineArgs};
use crate::core::config::PipelineMode;
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// # Build Arguments (`BuildArgs`)
///
/// Defines the command-line arguments accepted by the `bldrs build`
/// subcommand: the full shared option catalog.
#[derive(Parser, Debug)]
#[command(
    about = "Generate and build the project (full pipeline)",
    long_about = "Runs the full pipeline: CMake generate, build, and optionally tests,\n\
                  coverage report and benchmark report. Fails fast on the first\n\
                  non-zero step."
)]
pub struct BuildArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
}

/// # Handle Build Command (`handle_build`)
///
/// Assemble the configuration in full-pipeline mode and execute it.
pub fn handle_build(args: BuildArgs) -> Result<()> {
    debug!("Build args: {:?}", args);
    let cfg = args.pipeline.into_config(PipelineMode::Full)?;
    commands::execute(&cfg)
}
