//! # BldRS Coverage Translator (`toolchain::coverage`)
//!
//! File: cli/src/toolchain/coverage.rs
//!
//! ## Overview
//!
//! Translates the gcov coverage options into `GCOV_*` CMake cache
//! definitions, and owns the coverage-report step: after a successful test
//! run, `gcovr` is invoked against the configuration file the build scripts
//! wrote during the test run.
//!
//! When coverage is disabled this translator contributes nothing and the
//! report step is a no-op. When enabled, the configuration and report paths
//! default to locations inside the output directory; materializing the
//! default report directory is the one filesystem side effect a translator
//! is allowed (the directory must exist before CMake can write into it).
//! Paths handed to CMake are always forward-slashed.
//!
use crate::common::process::{self, CommandSpec, ExecContext, RunOutcome};
use crate::core::config::Config;
use crate::toolchain::cmake_path;
use anyhow::Context;
use clap::Args;
use std::{fs, path::PathBuf};

/// # Coverage Options (`CoverageOptions`)
///
/// The gcov/gcovr option group, flattened into the subcommand argument
/// structs.
#[derive(Args, Debug, Default, Clone)]
pub struct CoverageOptions {
    /// GCov: enable coverage collection.
    #[arg(long)]
    pub coverage: bool,

    /// GCov: collect coverage per target instead of for the entire project.
    // TODO: wire through to the build scripts once AddTarget.cmake grows
    // per-target coverage support; accepted but informational until then.
    #[arg(long = "coverage-per-target")]
    pub per_target: bool,

    /// GCov: path to the gcovr configuration file.
    #[arg(long = "coverage-config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// GCov: report output path.
    #[arg(id = "coverage_output", long = "coverage-output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// The gcovr configuration file path: explicit option, or
/// `<output>/gcov_config.txt`. Used by both the generate definitions and the
/// report step, so the two always agree.
pub fn config_file_path(cfg: &Config) -> PathBuf {
    cfg.coverage
        .config_file
        .clone()
        .unwrap_or_else(|| cfg.output.join("gcov_config.txt"))
}

/// CMake cache definitions for coverage collection. Empty when disabled.
/// Creates the default report directory when no explicit output path was
/// given — the only side effect of any translator.
pub fn cmake_defines(cfg: &Config) -> crate::core::error::Result<Vec<String>> {
    if !cfg.coverage.coverage {
        return Ok(Vec::new());
    }

    let mut cmake = vec!["-DGCOV_ENABLE=1".to_string()];
    cmake.push(format!("-DGCOV_CONF_PATH={}", cmake_path(&config_file_path(cfg))));

    let output_path = match &cfg.coverage.output {
        Some(path) => path.clone(),
        None => {
            let report_dir = cfg.output.join("code_coverage");
            fs::create_dir_all(&report_dir).with_context(|| {
                format!("Failed to create coverage directory {}", report_dir.display())
            })?;
            report_dir.join("index.html")
        }
    };
    cmake.push(format!("-DGCOV_OUTPUT_PATH={}", cmake_path(&output_path)));

    Ok(cmake)
}

/// # Coverage Report Step (`report`)
///
/// Run `gcovr` against the coverage configuration file, from the output
/// directory. A no-op reporting success when coverage is disabled; otherwise
/// the outcome is whatever gcovr exited with (the caller halts the pipeline
/// on non-zero).
pub fn report(cfg: &Config) -> crate::core::error::Result<RunOutcome> {
    if !cfg.coverage.coverage {
        return Ok(RunOutcome::Exited(0));
    }
    let spec = CommandSpec::new("gcovr")
        .arg("--config")
        .arg(cmake_path(&config_file_path(cfg)));
    process::run(&spec, &ExecContext::new(&cfg.output))
}
