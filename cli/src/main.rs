//! # BldRS Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the BldRS CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags (with an
//!   optional file sink mirroring the console output)
//! - Routing execution to the appropriate command handlers
//!
//! ## Architecture
//!
//! The application follows a modular command structure:
//! - Each top-level command (`build`, `test`, `bench`) is a variant in the
//!   `Commands` enum
//! - Commands are mapped to handler functions in their respective modules
//! - All errors are propagated to this level for consistent handling
//!
//! The whole tool is single-threaded and synchronous: there is one
//! foreground thread and at most one child process at a time, so `main` is
//! a plain `fn` with no async runtime.
//!
//! ## Examples
//!
//! Basic BldRS usage:
//!
//! ```bash
//! # Get help
//! bldrs --help
//!
//! # Full pipeline with increased verbosity
//! bldrs -v build --with-tests
//!
//! # Mirror the log into a file
//! bldrs --log-file build.log build
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level and `--log-file`
//! 3. Route to the appropriate command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use std::{fs::File, path::PathBuf, sync::Arc};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Handles specific command logic (build, test, bench).
mod common; // Contains shared utilities (process, platform, net).
mod core; // Core infrastructure (errors, config).
mod pipeline; // The fail-fast step orchestrator.
mod toolchain; // Option-to-flag translators (gtest, sanitizer, coverage, benchmark).

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "bldrs",
    about = "🛠️ BldRS: CMake Build Pipeline Driver & Tooling",
    long_about = "Drives a CMake-based toolchain through a fail-fast pipeline:\n\
                  generate, build, test, coverage report, benchmark report.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Mirror the log output into this file as well.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "b")]
    Build(commands::build::BuildArgs),
    #[command(alias = "t")]
    Test(commands::test::TestArgs),
    Bench(commands::bench::BenchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Child output is re-emitted through the logger line by line, so the
    // default is info rather than the quieter warn.
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();
    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| anyhow::anyhow!("Cannot open log file {}: {}", path.display(), e))?;
            let file_layer = fmt::layer()
                .with_writer(Arc::new(file))
                .with_target(false)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
        }
    }

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Build(args) => commands::build::handle_build(args),
        Commands::Test(args) => commands::test::handle_test(args),
        Commands::Bench(args) => commands::bench::handle_bench(args),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
