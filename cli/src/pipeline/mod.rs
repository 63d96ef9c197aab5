//! # BldRS Pipeline Orchestrator (`pipeline`)
//!
//! File: cli/src/pipeline/mod.rs
//!
//! ## Overview
//!
//! This module sequences the build pipeline: generate → build → test →
//! coverage report → benchmark report. It is a fixed linear sequence with
//! fail-fast semantics, not a scheduler: the first step that exits non-zero
//! terminates the pipeline immediately and no subsequent step runs. Steps
//! never run concurrently; there is exactly one child process at a time.
//!
//! ## Architecture
//!
//! - `Step` / `PipelineStatus`: which phase ran, and whether the pipeline as
//!   a whole succeeded or which step it died in. A non-zero tool status is a
//!   first-class value here — only setup faults (bad paths, missing
//!   executables) propagate as errors.
//! - `generate_command` / `build_command` / `test_command`: pure assembly of
//!   each step's `CommandSpec` from the configuration record, unit-testable
//!   without CMake installed. The generate command concatenates the core
//!   options with every translator's cache definitions.
//! - `run`: drives the steps for the requested mode. Tests-only and
//!   benchmarks-only modes skip generate and build entirely; coverage runs
//!   only after a successful test step; `--generate-only` stops after
//!   generation.
//!
//! The generate step also makes sure the `AddTarget.cmake` helper script is
//! present in the build tree, downloading it on first use. A failed download
//! is logged and the pipeline continues: if the script survives from a prior
//! run the configure step works anyway, otherwise CMake will fail on its own
//! and the failure surfaces there.
//!
use crate::common::{
    net,
    platform::{self, Platform},
    process::{self, CommandSpec, ExecContext, RunOutcome},
};
use crate::core::config::{CmakeLogLevel, Config, PipelineMode};
use crate::toolchain::{benchmark, coverage, gtest, sanitizer};
use anyhow::Context;
use std::{fmt, fs};
use tracing::{error, info, warn};

// Canonical source of the AddTarget.cmake helper the build scripts include.
const ADD_TARGET_URL: &str =
    "https://raw.githubusercontent.com/iblis-ms/cmake_add_target/master/AddTarget.cmake";
// Name the helper script is stored under inside the build tree.
const ADD_TARGET_FILENAME: &str = "addTarget.cmake";
// Name of the test step's streamed log inside the output directory.
const TESTS_OUTPUT_FILENAME: &str = "testsOutput.txt";

/// One discrete phase of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Generate,
    Build,
    Test,
    CoverageReport,
    BenchmarkReport,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Generate => "generate",
            Step::Build => "build",
            Step::Test => "test",
            Step::CoverageReport => "coverage report",
            Step::BenchmarkReport => "benchmark report",
        };
        write!(f, "{name}")
    }
}

/// Terminal state of one pipeline run: overall success, or the first step
/// that exited non-zero (all later steps were skipped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Success,
    Failed { step: Step, status: i32 },
}

impl PipelineStatus {
    fn failed(step: Step, outcome: &RunOutcome) -> PipelineStatus {
        PipelineStatus::Failed {
            step,
            status: outcome.status(),
        }
    }

    /// Whether every requested step returned zero.
    pub fn success(&self) -> bool {
        matches!(self, PipelineStatus::Success)
    }
}

/// # Run the Pipeline (`run`)
///
/// Execute the steps the configuration's mode requests, fail-fast. Returns
/// the terminal `PipelineStatus` as data; only setup faults become `Err`.
pub fn run(cfg: &Config) -> crate::core::error::Result<PipelineStatus> {
    match cfg.mode {
        PipelineMode::Full => {
            let outcome = generate(cfg)?;
            if !outcome.success() {
                return Ok(PipelineStatus::failed(Step::Generate, &outcome));
            }
            if cfg.generate_only {
                return Ok(PipelineStatus::Success);
            }

            let outcome = build(cfg)?;
            if !outcome.success() {
                return Ok(PipelineStatus::failed(Step::Build, &outcome));
            }

            if cfg.tests_requested() {
                if let Some(failed) = test_and_coverage(cfg)? {
                    return Ok(failed);
                }
            }
            if cfg.benchmarks_requested() {
                let outcome = benchmark::report(cfg)?;
                if !outcome.success() {
                    return Ok(PipelineStatus::failed(Step::BenchmarkReport, &outcome));
                }
            }
            Ok(PipelineStatus::Success)
        }
        PipelineMode::TestsOnly => match test_and_coverage(cfg)? {
            Some(failed) => Ok(failed),
            None => Ok(PipelineStatus::Success),
        },
        PipelineMode::BenchmarksOnly => {
            let outcome = benchmark::report(cfg)?;
            if !outcome.success() {
                return Ok(PipelineStatus::failed(Step::BenchmarkReport, &outcome));
            }
            Ok(PipelineStatus::Success)
        }
    }
}

/// Run the test step, then the coverage report. Coverage only runs after a
/// successful test step. Returns the failure to propagate, if any.
fn test_and_coverage(cfg: &Config) -> crate::core::error::Result<Option<PipelineStatus>> {
    let outcome = test(cfg)?;
    if !outcome.success() {
        return Ok(Some(PipelineStatus::failed(Step::Test, &outcome)));
    }
    let outcome = coverage::report(cfg)?;
    if !outcome.success() {
        return Ok(Some(PipelineStatus::failed(Step::CoverageReport, &outcome)));
    }
    Ok(None)
}

/// The generate step: prepare the output directory, make sure the helper
/// script is present, and run CMake's configure/generate in the build tree.
fn generate(cfg: &Config) -> crate::core::error::Result<RunOutcome> {
    if cfg.clean {
        info!("Clean build: removing {}", cfg.output.display());
        // A not-yet-existing output directory is not an error on clean.
        let _ = fs::remove_dir_all(&cfg.output);
    }
    fs::create_dir_all(&cfg.output).with_context(|| {
        format!("Failed to create output directory {}", cfg.output.display())
    })?;

    ensure_helper_script(cfg);

    let spec = generate_command(cfg, &platform::current())?;
    process::run(&spec, &ExecContext::new(&cfg.output))
}

/// The build step: `cmake --build .` in the build tree.
fn build(cfg: &Config) -> crate::core::error::Result<RunOutcome> {
    process::run(&build_command(cfg), &ExecContext::new(&cfg.output))
}

/// The test step: `ctest --verbose` in the build tree, with the combined
/// output additionally streamed to `<output>/testsOutput.txt`.
fn test(cfg: &Config) -> crate::core::error::Result<RunOutcome> {
    let log_path = cfg.output.join(TESTS_OUTPUT_FILENAME);
    let ctx = ExecContext::new(&cfg.output).output_file(log_path);
    process::run(&test_command(cfg), &ctx)
}

/// Download `AddTarget.cmake` into the build tree unless it is already
/// there. Failure is logged but deliberately non-fatal: a copy from a prior
/// run keeps working, and without one the configure step fails visibly.
fn ensure_helper_script(cfg: &Config) {
    let script_path = cfg.output.join(ADD_TARGET_FILENAME);
    if script_path.is_file() {
        return;
    }
    if let Err(e) = net::download_script(ADD_TARGET_URL, &script_path) {
        error!("Could not fetch {}: {:#}", ADD_TARGET_FILENAME, e);
        warn!("Continuing; the generate step will fail if the script is required and absent");
    }
}

/// Assemble the CMake configure/generate invocation from the core options
/// and every translator's cache definitions. Pure apart from the coverage
/// translator's report-directory side effect.
fn generate_command(cfg: &Config, platform: &Platform) -> crate::core::error::Result<CommandSpec> {
    let mut spec = CommandSpec::new("cmake");

    if let Some(generator) = &cfg.generator {
        spec = spec.args(["-G", generator.as_str()]);
    }

    // Visual Studio generators (explicit, or implied on a Windows host with
    // no generator chosen) take an architecture selection.
    let visual_studio = match &cfg.generator {
        None => platform.windows,
        Some(generator) => generator.contains("Visual"),
    };
    if visual_studio {
        let arch = cfg.vc_architecture.as_deref().unwrap_or("x64");
        spec = spec.args(["-A", arch]);
    }

    spec = spec
        .arg(format!("-DCMAKE_BUILD_TYPE={}", cfg.profile.as_str()))
        .arg(format!("-DCMAKE_CXX_STANDARD={}", cfg.cpp_standard.as_u32()));

    if !cfg.c_definitions.is_empty() {
        spec = spec.arg(format!(
            "-DGLOBAL_COMPILE_DEFINES={}",
            cfg.c_definitions.join(";")
        ));
    }
    if let Some(c_compiler) = &cfg.c_compiler {
        spec = spec.arg(format!("-DCMAKE_C_COMPILER={c_compiler}"));
    }
    if let Some(cxx_compiler) = &cfg.cxx_compiler {
        spec = spec.arg(format!("-DCMAKE_CXX_COMPILER={cxx_compiler}"));
    }
    for definition in &cfg.cmake_definitions {
        spec = spec.arg(format!("-D{definition}"));
    }
    if let Some(include) = &cfg.test_include {
        spec = spec.arg(format!("-DADD_TARGET_TEST_TARGET_INCLUDE={include}"));
    }
    if let Some(exclude) = &cfg.test_exclude {
        spec = spec.arg(format!("-DADD_TARGET_TEST_TARGET_EXCLUDE={exclude}"));
    }
    if let Some(include) = &cfg.benchmark_include {
        spec = spec.arg(format!("-DADD_TARGET_BENCHMARK_TARGET_INCLUDE={include}"));
    }
    if let Some(exclude) = &cfg.benchmark_exclude {
        spec = spec.arg(format!("-DADD_TARGET_BENCHMARK_TARGET_EXCLUDE={exclude}"));
    }

    let log_level = cfg.cmake_log_level.as_str();
    spec = spec
        .arg(format!("--log-level={log_level}"))
        .arg(format!("-DLOG_LEVEL={log_level}"));
    if cfg.cmake_log_level == CmakeLogLevel::Trace {
        spec = spec.args(["--log-context", "--debug-output", "--trace-expand"]);
    }

    spec = spec.args(gtest::cmake_defines(cfg));
    spec = spec.args(sanitizer::cmake_defines(cfg));
    spec = spec.args(coverage::cmake_defines(cfg)?);
    spec = spec.args(benchmark::cmake_defines(cfg));

    // The source tree goes last, after every -D.
    Ok(spec.arg(cfg.input.display().to_string()))
}

/// Assemble the build invocation: `cmake --build . [--target T] --config P`.
fn build_command(cfg: &Config) -> CommandSpec {
    let mut spec = CommandSpec::new("cmake").args(["--build", "."]);
    if let Some(target) = &cfg.target {
        spec = spec.args(["--target", target.as_str()]);
    }
    spec.args(["--config", cfg.profile.as_str()])
}

/// Assemble the test invocation: `ctest --verbose -C P`.
fn test_command(cfg: &Config) -> CommandSpec {
    CommandSpec::new("ctest")
        .arg("--verbose")
        .args(["-C", cfg.profile.as_str()])
}
