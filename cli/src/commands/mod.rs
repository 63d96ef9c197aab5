//! # BldRS Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands that comprise the BldRS CLI.
//! It serves as the central point for importing and re-exporting command
//! modules to make them accessible to the main application entry point
//! (`main.rs`), and defines the option groups the commands share.
//!
//! ## Architecture
//!
//! The three commands select the pipeline mode; everything else about an
//! invocation is the shared option catalog:
//! - `build`: the full pipeline (generate, build, then tests/reports when
//!   requested)
//! - `test`: tests-only mode — skip generate and build entirely
//! - `bench`: benchmarks-only mode — run the benchmark report only
//!
//! `PipelineArgs` flattens the core option group plus one group per
//! toolchain translator into a single clap surface, so every command accepts
//! the same catalog (mirroring the one-parser design of classic build
//! drivers) and differs only in the mode it selects.
//!
use crate::core::config::{Config, CoreOptions, PipelineMode};
use crate::core::error::Result;
use crate::pipeline::{self, PipelineStatus};
use crate::toolchain::{
    benchmark::BenchmarkOptions, coverage::CoverageOptions, gtest::GtestOptions,
    sanitizer::SanitizerOptions,
};
use clap::Args;
use tracing::info;

/// Runs the full pipeline.
pub mod build;
/// Runs tests (and coverage) against an existing build tree.
pub mod test;
/// Runs the benchmark report against an existing build tree.
pub mod bench;

/// # Shared Pipeline Arguments (`PipelineArgs`)
///
/// The complete option catalog, shared by every subcommand: the core
/// generator/compiler/profile options plus each translator's option group.
/// Flattening the groups here is how translators register their recognized
/// options into the shared schema.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[command(flatten)]
    pub core: CoreOptions,

    #[command(flatten)]
    pub gtest: GtestOptions,

    #[command(flatten)]
    pub sanitizer: SanitizerOptions,

    #[command(flatten)]
    pub coverage: CoverageOptions,

    #[command(flatten)]
    pub benchmark: BenchmarkOptions,
}

impl PipelineArgs {
    /// Assemble the configuration record for the given mode (merging
    /// file-based defaults underneath the parsed flags).
    pub fn into_config(self, mode: PipelineMode) -> Result<Config> {
        Config::assemble(
            self.core,
            self.gtest,
            self.sanitizer,
            self.coverage,
            self.benchmark,
            mode,
        )
    }
}

/// Validate the configuration, run the pipeline, and translate its terminal
/// state: success is quiet, a failed step becomes the error the top level
/// reports and turns into a non-zero process exit.
pub fn execute(cfg: &Config) -> Result<()> {
    cfg.validate()?;
    match pipeline::run(cfg)? {
        PipelineStatus::Success => {
            info!("Pipeline finished successfully");
            Ok(())
        }
        PipelineStatus::Failed { step, status } => {
            anyhow::bail!("{step} step failed with status {status}")
        }
    }
}
