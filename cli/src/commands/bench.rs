//! # BldRS Bench Command
//!
//! File: cli/src/commands/bench.rs
//!
//! ## Overview
//!
//! This module implements the `bldrs bench` command: benchmarks-only mode.
//! Generate, build and tests are all skipped; the benchmark executables
//! listed in `<output>/paths_to_benchmarks.txt` (written by the build
//! scripts during a prior build) run one at a time, each from its own
//! directory, with per-benchmark reports written next to the executables.
//!
//! ## Examples
//!
//! ```bash
//! # Run every built benchmark
//! bldrs bench
//!
//! # Run a filtered subset
//! bldrs bench --benchmark-filter 'BM_Parse.*'
//! ```
//!
use crate::commands::{self, PipelineArgs};
use crate::core::config::PipelineMode;
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// # Bench Arguments (`BenchArgs`)
///
/// Defines the command-line arguments accepted by the `bldrs bench`
/// subcommand: the full shared option catalog (generation options are
/// accepted for symmetry but unused in this mode).
#[derive(Parser, Debug)]
#[command(
    about = "Run built benchmarks and collect their reports",
    long_about = "Runs the benchmark executables listed in\n\
                  <output>/paths_to_benchmarks.txt, streaming each one's output\n\
                  into a <name>_benchmark.txt next to it. Stops at the first\n\
                  failing benchmark."
)]
pub struct BenchArgs {
    #[command(flatten)]
    pipeline: PipelineArgs,
}

/// # Handle Bench Command (`handle_bench`)
///
/// Assemble the configuration in benchmarks-only mode and execute it.
pub fn handle_bench(args: BenchArgs) -> Result<()> {
    debug!("Bench args: {:?}", args);
    let cfg = args.pipeline.into_config(PipelineMode::BenchmarksOnly)?;
    commands::execute(&cfg)
}
