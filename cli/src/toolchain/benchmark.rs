//! # BldRS Benchmark Translator (`toolchain::benchmark`)
//!
//! File: cli/src/toolchain/benchmark.rs
//!
//! ## Overview
//!
//! Translates the Google Benchmark options into the `GBENCHMARK_ENABLE`
//! cache definition, and owns the benchmark-report step: the build scripts
//! write a line-delimited list of benchmark executable paths into the output
//! directory (`paths_to_benchmarks.txt`), and this step runs each executable
//! from its own directory, streaming its output into a sibling
//! `<name>_benchmark.txt` file. The first non-zero benchmark halts the step.
//!
//! An absent list file is a no-op — nothing was built with benchmarks
//! enabled, so there is nothing to report. Entries whose executable no
//! longer exists are skipped with a warning rather than failing the run.
//!
use crate::common::{
    platform,
    process::{self, CommandSpec, ExecContext, RunOutcome},
};
use crate::core::config::Config;
use anyhow::Context;
use clap::Args;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

// Name of the list file the build scripts produce in the output directory.
const BENCHMARK_LIST_FILE: &str = "paths_to_benchmarks.txt";

/// # Benchmark Options (`BenchmarkOptions`)
///
/// The Google Benchmark option group, flattened into the subcommand
/// argument structs.
#[derive(Args, Debug, Default, Clone)]
pub struct BenchmarkOptions {
    /// Benchmark: build and run benchmarks after a successful build/test.
    #[arg(long = "with-benchmarks")]
    pub benchmarks: bool,

    /// GoogleBenchmark: filter regex passed as --benchmark_filter.
    #[arg(id = "benchmark_filter", long = "benchmark-filter", value_name = "REGEX")]
    pub filter: Option<String>,
}

/// CMake cache definitions enabling benchmark targets. Empty unless
/// benchmarks were requested (by flag or by the `bench` subcommand).
pub fn cmake_defines(cfg: &Config) -> Vec<String> {
    if cfg.benchmarks_requested() {
        vec!["-DGBENCHMARK_ENABLE=1".to_string()]
    } else {
        Vec::new()
    }
}

/// # Benchmark Report Step (`report`)
///
/// Run every benchmark executable listed in `<output>/paths_to_benchmarks.txt`,
/// one at a time, each from its own directory with its output streamed to
/// `<dir>/<stem>_benchmark.txt`. Returns the first non-zero outcome
/// (halting the remainder), or success once all entries ran clean.
pub fn report(cfg: &Config) -> crate::core::error::Result<RunOutcome> {
    if !cfg.benchmarks_requested() {
        return Ok(RunOutcome::Exited(0));
    }
    let list_path = cfg.output.join(BENCHMARK_LIST_FILE);
    if !list_path.is_file() {
        info!(
            "No benchmark list at {}; nothing to run",
            list_path.display()
        );
        return Ok(RunOutcome::Exited(0));
    }

    let list = fs::read_to_string(&list_path)
        .with_context(|| format!("Failed to read {}", list_path.display()))?;
    for line in list.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let exe_path = PathBuf::from(line);
        if !exe_path.is_file() {
            warn!("Benchmark executable missing, skipping: {}", line);
            continue;
        }
        let outcome = run_one(cfg, &exe_path)?;
        if !outcome.success() {
            return Ok(outcome);
        }
    }
    Ok(RunOutcome::Exited(0))
}

/// Run a single benchmark executable from its own directory.
fn run_one(cfg: &Config, exe_path: &Path) -> crate::core::error::Result<RunOutcome> {
    let file_name = exe_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid benchmark path: {}", exe_path.display()))?;
    let dir = match exe_path.parent() {
        Some(parent) if parent != Path::new("") => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let stem = exe_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let report_path = dir.join(format!("{stem}_benchmark.txt"));

    // POSIX shells do not search the working directory; Windows resolution does.
    let program = if platform::current().windows {
        file_name.to_string()
    } else {
        format!("./{file_name}")
    };
    let mut spec = CommandSpec::new(program);
    if let Some(filter) = &cfg.benchmark.filter {
        spec = spec.arg(format!("--benchmark_filter={filter}"));
    }
    process::run(&spec, &ExecContext::new(dir).output_file(report_path))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, CoreOptions, PipelineMode};
    use crate::toolchain::{
        coverage::CoverageOptions, gtest::GtestOptions, sanitizer::SanitizerOptions,
    };

    fn config_with(
        benchmark: BenchmarkOptions,
        mode: PipelineMode,
        output: Option<PathBuf>,
    ) -> Config {
        Config::assemble(
            CoreOptions {
                output,
                ..Default::default()
            },
            GtestOptions::default(),
            SanitizerOptions::default(),
            CoverageOptions::default(),
            benchmark,
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_disabled_benchmarks_produce_no_flags() {
        let cfg = config_with(BenchmarkOptions::default(), PipelineMode::Full, None);
        assert!(cmake_defines(&cfg).is_empty());
    }

    #[test]
    fn test_flag_enables_define() {
        let cfg = config_with(
            BenchmarkOptions {
                benchmarks: true,
                ..Default::default()
            },
            PipelineMode::Full,
            None,
        );
        assert_eq!(cmake_defines(&cfg), vec!["-DGBENCHMARK_ENABLE=1"]);
    }

    #[test]
    fn test_bench_mode_implies_define() {
        let cfg = config_with(
            BenchmarkOptions::default(),
            PipelineMode::BenchmarksOnly,
            None,
        );
        assert_eq!(cmake_defines(&cfg), vec!["-DGBENCHMARK_ENABLE=1"]);
    }

    #[test]
    fn test_report_without_list_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_with(
            BenchmarkOptions {
                benchmarks: true,
                ..Default::default()
            },
            PipelineMode::Full,
            Some(dir.path().to_path_buf()),
        );
        let outcome = report(&cfg).unwrap();
        assert!(outcome.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_report_runs_listed_executables_and_writes_reports() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("my_bench");
        fs::write(&exe, "#!/bin/sh\necho bench ran\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(
            dir.path().join(BENCHMARK_LIST_FILE),
            format!("{}\n", exe.display()),
        )
        .unwrap();

        let cfg = config_with(
            BenchmarkOptions {
                benchmarks: true,
                ..Default::default()
            },
            PipelineMode::BenchmarksOnly,
            Some(dir.path().to_path_buf()),
        );
        let outcome = report(&cfg).unwrap();
        assert!(outcome.success());
        let report_file = dir.path().join("my_bench_benchmark.txt");
        assert_eq!(fs::read_to_string(report_file).unwrap(), "bench ran\n");
    }

    #[test]
    fn test_missing_executables_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(BENCHMARK_LIST_FILE),
            "/definitely/not/a/real/bench\n",
        )
        .unwrap();
        let cfg = config_with(
            BenchmarkOptions {
                benchmarks: true,
                ..Default::default()
            },
            PipelineMode::Full,
            Some(dir.path().to_path_buf()),
        );
        assert!(report(&cfg).unwrap().success());
    }
}
