//! # BldRS Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module defines the configuration record for one `bldrs` invocation:
//! the aggregate of every parsed option, owned by the pipeline orchestrator
//! and passed by reference to each toolchain translator and to the process
//! runner's callers. It also implements loading of optional file-based
//! defaults and validation of the final record.
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - Command-line flags are the primary source (parsed by `clap` into
//!   `CoreOptions` plus one option group per toolchain translator)
//! - Optional defaults come from TOML files; paths are expanded (`~` to home)
//! - Precedence: CLI flag > project `.bldrs.toml` > user config file >
//!   built-in default
//! - The merged `Config` is validated for correctness before the pipeline runs
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line arguments
//! 2. Project-specific `.bldrs.toml` in the current directory or ancestors
//! 3. User-specific `~/.config/bldrs/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! Assembling and using the configuration:
//!
//! ```rust
//! let cfg = Config::assemble(core, gtest, sanitizer, coverage, benchmark, PipelineMode::Full)?;
//! cfg.validate()?;
//!
//! // Access resolved settings
//! let profile = cfg.profile.as_str();     // "Debug" or "Release"
//! let build_dir = &cfg.output;            // defaults to ./output
//! ```
//!
//! The configuration is assembled once per command execution and does not
//! outlive the invocation.
//!
use crate::core::error::{BldrsError, Result};
use crate::toolchain::{
    benchmark::BenchmarkOptions, coverage::CoverageOptions, gtest::GtestOptions,
    sanitizer::SanitizerOptions,
};
use anyhow::Context;
use clap::{Args, ValueEnum};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Build profile handed to CMake as `CMAKE_BUILD_TYPE` / `--config`.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Release,
    Debug,
}

impl Profile {
    /// The exact spelling CMake expects (`Release` / `Debug`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Release => "Release",
            Profile::Debug => "Debug",
        }
    }
}

/// Supported C++ standards, handed to CMake as `CMAKE_CXX_STANDARD`.
///
/// The clap value names are the bare numbers (`--cpp-standard 17`), matching
/// what the CMake variable expects.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CppStandard {
    #[value(name = "98")]
    Cpp98,
    #[value(name = "11")]
    Cpp11,
    #[value(name = "14")]
    Cpp14,
    #[value(name = "17")]
    Cpp17,
    #[value(name = "20")]
    Cpp20,
}

impl CppStandard {
    /// The numeric value CMake expects.
    pub fn as_u32(&self) -> u32 {
        match self {
            CppStandard::Cpp98 => 98,
            CppStandard::Cpp11 => 11,
            CppStandard::Cpp14 => 14,
            CppStandard::Cpp17 => 17,
            CppStandard::Cpp20 => 20,
        }
    }
}

/// CMake message log levels, passed through via `--log-level` and the
/// project-visible `LOG_LEVEL` cache variable.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmakeLogLevel {
    Error,
    Warning,
    Notice,
    Status,
    Verbose,
    Debug,
    Trace,
}

impl CmakeLogLevel {
    /// The upper-case spelling CMake expects on its command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            CmakeLogLevel::Error => "ERROR",
            CmakeLogLevel::Warning => "WARNING",
            CmakeLogLevel::Notice => "NOTICE",
            CmakeLogLevel::Status => "STATUS",
            CmakeLogLevel::Verbose => "VERBOSE",
            CmakeLogLevel::Debug => "DEBUG",
            CmakeLogLevel::Trace => "TRACE",
        }
    }
}

/// Which steps of the pipeline an invocation requests. Selected by the
/// subcommand (`build`, `test`, `bench`), never by a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    /// Generate and build, plus tests/reports when requested.
    Full,
    /// Skip generate and build entirely; run tests (and coverage) only.
    TestsOnly,
    /// Skip generate, build and tests; run the benchmark report only.
    BenchmarksOnly,
}

/// # Core Options (`CoreOptions`)
///
/// The generator/compiler/profile option group shared by every subcommand.
/// Fields that can also be supplied by a configuration file are `Option`s
/// here so that "flag absent" is distinguishable from "flag at default";
/// the merge in [`Config::assemble`] resolves them.
#[derive(Args, Debug, Default, Clone)]
pub struct CoreOptions {
    /// Build type.
    #[arg(short, long, value_enum)]
    pub profile: Option<Profile>,

    /// Clean build - remove the output directory before generation.
    #[arg(short, long)]
    pub clean: bool,

    /// CMake generator.
    #[arg(short, long)]
    pub generator: Option<String>,

    /// Stop after the generate step.
    #[arg(long)]
    pub generate_only: bool,

    /// C compiler.
    #[arg(long, value_name = "COMPILER")]
    pub c_compiler: Option<String>,

    /// C++ compiler.
    #[arg(long, value_name = "COMPILER")]
    pub cxx_compiler: Option<String>,

    /// Target to build.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Definitions passed straight to CMake (NAME=VALUE, repeatable).
    #[arg(short = 'D', long = "cmake-define", value_name = "NAME=VALUE")]
    pub cmake_definitions: Vec<String>,

    /// Compile definitions for C/C++ (repeatable).
    #[arg(long = "c-define", value_name = "NAME[=VALUE]")]
    pub c_definitions: Vec<String>,

    /// Visual Studio generator architecture (defaults to x64 when relevant).
    #[arg(long, value_name = "ARCH")]
    pub vc_architecture: Option<String>,

    /// C++ standard.
    #[arg(long, value_enum)]
    pub cpp_standard: Option<CppStandard>,

    /// Run tests after a successful build.
    #[arg(long)]
    pub with_tests: bool,

    /// Include regex for test targets.
    #[arg(long, value_name = "REGEX")]
    pub test_include: Option<String>,

    /// Exclude regex for test targets.
    #[arg(long, value_name = "REGEX")]
    pub test_exclude: Option<String>,

    /// Include regex for benchmark targets.
    #[arg(long, value_name = "REGEX")]
    pub benchmark_include: Option<String>,

    /// Exclude regex for benchmark targets.
    #[arg(long, value_name = "REGEX")]
    pub benchmark_exclude: Option<String>,

    /// Output folder (build tree). Defaults to ./output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input folder (where the top CMakeLists.txt lives). Defaults to ./code.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// CMake log level.
    #[arg(long, value_enum)]
    pub cmake_log_level: Option<CmakeLogLevel>,
}

/// Defaults file structure (`.bldrs.toml` / user `config.toml`).
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: FileDefaults,
}

/// The `[defaults]` section of a configuration file.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileDefaults {
    /// Default build profile (`Release` or `Debug`).
    pub profile: Option<Profile>,
    /// Default CMake generator.
    pub generator: Option<String>,
    /// Default input folder (can use ~). Will be expanded.
    pub input: Option<String>,
    /// Default output folder (can use ~). Will be expanded.
    pub output: Option<String>,
}

/// # Configuration Record (`Config`)
///
/// The aggregate of all parsed options for one invocation. Owned by the
/// pipeline orchestrator; every translator's flag-producing function and the
/// process runner's callers receive it by reference. Constructed fresh per
/// invocation and discarded afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub clean: bool,
    pub generator: Option<String>,
    pub generate_only: bool,
    pub c_compiler: Option<String>,
    pub cxx_compiler: Option<String>,
    pub target: Option<String>,
    pub cmake_definitions: Vec<String>,
    pub c_definitions: Vec<String>,
    pub vc_architecture: Option<String>,
    pub cpp_standard: CppStandard,
    pub with_tests: bool,
    pub test_include: Option<String>,
    pub test_exclude: Option<String>,
    pub benchmark_include: Option<String>,
    pub benchmark_exclude: Option<String>,
    pub output: PathBuf,
    pub input: PathBuf,
    pub cmake_log_level: CmakeLogLevel,

    pub gtest: GtestOptions,
    pub sanitizer: SanitizerOptions,
    pub coverage: CoverageOptions,
    pub benchmark: BenchmarkOptions,

    pub mode: PipelineMode,
}

// Name of the project-level defaults file searched for in ancestors.
const PROJECT_CONFIG_FILENAME: &str = ".bldrs.toml";

impl Config {
    /// Merge the parsed option groups with file-based defaults into the final
    /// record. Precedence: CLI flag > project file > user file > built-in.
    pub fn assemble(
        core: CoreOptions,
        gtest: GtestOptions,
        sanitizer: SanitizerOptions,
        coverage: CoverageOptions,
        benchmark: BenchmarkOptions,
        mode: PipelineMode,
    ) -> Result<Config> {
        let file_defaults = load_file_defaults()?.unwrap_or_default();

        let current_dir = std::env::current_dir().context("Failed to get current directory")?;

        let input = core
            .input
            .or_else(|| file_defaults.input.as_deref().map(expand_path))
            .unwrap_or_else(|| current_dir.join("code"));
        let output = core
            .output
            .or_else(|| file_defaults.output.as_deref().map(expand_path))
            .unwrap_or_else(|| current_dir.join("output"));

        let cfg = Config {
            profile: core
                .profile
                .or(file_defaults.profile)
                .unwrap_or(Profile::Debug),
            clean: core.clean,
            generator: core.generator.or(file_defaults.generator),
            generate_only: core.generate_only,
            c_compiler: core.c_compiler,
            cxx_compiler: core.cxx_compiler,
            target: core.target,
            cmake_definitions: core.cmake_definitions,
            c_definitions: core.c_definitions,
            vc_architecture: core.vc_architecture,
            cpp_standard: core.cpp_standard.unwrap_or(CppStandard::Cpp17),
            with_tests: core.with_tests,
            test_include: core.test_include,
            test_exclude: core.test_exclude,
            benchmark_include: core.benchmark_include,
            benchmark_exclude: core.benchmark_exclude,
            output,
            input,
            cmake_log_level: core.cmake_log_level.unwrap_or(CmakeLogLevel::Status),
            gtest,
            sanitizer,
            coverage,
            benchmark,
            mode,
        };
        debug!("Assembled configuration: {:?}", cfg);
        Ok(cfg)
    }

    /// Whether this invocation should run the test step at all.
    pub fn tests_requested(&self) -> bool {
        self.with_tests || self.mode == PipelineMode::TestsOnly
    }

    /// Whether this invocation should run the benchmark-report step at all.
    pub fn benchmarks_requested(&self) -> bool {
        self.benchmark.benchmarks || self.mode == PipelineMode::BenchmarksOnly
    }

    /// Validate the record before the pipeline runs. Configuration errors are
    /// the user's to fix; nothing here is retried or recovered internally.
    pub fn validate(&self) -> Result<()> {
        // The input tree is only read by the generate step.
        if self.mode == PipelineMode::Full && !self.input.is_dir() {
            anyhow::bail!(BldrsError::Config(format!(
                "Input directory does not exist: {}",
                self.input.display()
            )));
        }
        if let Some(sanitizer) = self.sanitizer.sanitizer {
            let platform = crate::common::platform::current();
            if !sanitizer.supported_on(&platform) {
                anyhow::bail!(BldrsError::Config(format!(
                    "Sanitizer '{}' is not available on this platform",
                    sanitizer.flag_name()
                )));
            }
        }
        Ok(())
    }
}

/// Expand `~` and environment references in a path from a config file.
fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

/// Load defaults from the project file if present, else the user file.
fn load_file_defaults() -> Result<Option<FileDefaults>> {
    if let Some(path) = find_project_config_path()? {
        info!("Loading project defaults from: {}", path.display());
        return load_file_config(&path).map(|c| Some(c.defaults));
    }
    if let Some(proj_dirs) = ProjectDirs::from("com", "BldRS", "bldrs") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user defaults from: {}", config_path.display());
            return load_file_config(&config_path).map(|c| Some(c.defaults));
        }
        debug!("No user defaults file at {}", config_path.display());
    } else {
        warn!("Could not determine user config directory.");
    }
    Ok(None)
}

/// Walk from the current directory upwards looking for `.bldrs.toml`.
/// Stops at the first directory containing a `.git` folder, or at the root.
fn find_project_config_path() -> Result<Option<PathBuf>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    let mut path: &Path = &current_dir;
    loop {
        let candidate = path.join(PROJECT_CONFIG_FILENAME);
        if candidate.is_file() {
            return Ok(Some(candidate));
        }
        // Treat a repository root as the search boundary.
        if path.join(".git").exists() {
            return Ok(None);
        }
        match path.parent() {
            Some(parent) => path = parent,
            None => return Ok(None),
        }
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(core: CoreOptions, mode: PipelineMode) -> Config {
        Config::assemble(
            core,
            GtestOptions::default(),
            SanitizerOptions::default(),
            CoverageOptions::default(),
            BenchmarkOptions::default(),
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_defaults() {
        let cfg = assemble(CoreOptions::default(), PipelineMode::TestsOnly);
        assert_eq!(cfg.profile, Profile::Debug);
        assert_eq!(cfg.cpp_standard, CppStandard::Cpp17);
        assert_eq!(cfg.cmake_log_level, CmakeLogLevel::Status);
        assert!(cfg.output.ends_with("output"));
        assert!(cfg.input.ends_with("code"));
        assert!(cfg.generator.is_none());
    }

    #[test]
    fn test_cli_overrides_defaults() {
        let core = CoreOptions {
            profile: Some(Profile::Release),
            cpp_standard: Some(CppStandard::Cpp20),
            output: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };
        let cfg = assemble(core, PipelineMode::TestsOnly);
        assert_eq!(cfg.profile, Profile::Release);
        assert_eq!(cfg.cpp_standard.as_u32(), 20);
        assert_eq!(cfg.output, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_file_config_parses() {
        let cfg: FileConfig = toml::from_str(
            r#"
            [defaults]
            profile = "Release"
            generator = "Ninja"
            output = "build"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.defaults.profile, Some(Profile::Release));
        assert_eq!(cfg.defaults.generator.as_deref(), Some("Ninja"));
        assert_eq!(cfg.defaults.output.as_deref(), Some("build"));
    }

    #[test]
    fn test_file_config_rejects_unknown_fields() {
        let result: std::result::Result<FileConfig, _> = toml::from_str(
            r#"
            [defaults]
            profil = "Release"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_missing_input_dir() {
        let core = CoreOptions {
            input: Some(PathBuf::from("/definitely/not/a/real/input/dir")),
            ..Default::default()
        };
        let cfg = assemble(core, PipelineMode::Full);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Input directory"));
    }

    #[test]
    fn test_validate_skips_input_check_for_tests_only() {
        let core = CoreOptions {
            input: Some(PathBuf::from("/definitely/not/a/real/input/dir")),
            ..Default::default()
        };
        let cfg = assemble(core, PipelineMode::TestsOnly);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_cmake_log_level_spelling() {
        assert_eq!(CmakeLogLevel::Status.as_str(), "STATUS");
        assert_eq!(CmakeLogLevel::Trace.as_str(), "TRACE");
    }
}
