//! # BldRS Sanitizer Translator (`toolchain::sanitizer`)
//!
//! File: cli/src/toolchain/sanitizer.rs
//!
//! ## Overview
//!
//! Translates the memory/UB-tooling selection into the `ADD_TARGET_*` CMake
//! cache definitions the generated build scripts understand. At most one
//! sanitizer can be active per invocation.
//!
//! Availability depends on the host family: Dr. Memory is Windows-only,
//! while valgrind and the clang sanitizers require a POSIX host. The choice
//! is validated against the platform probe during configuration validation,
//! not here — this module stays a pure mapping.
//!
use crate::common::platform::Platform;
use crate::core::config::Config;
use clap::{Args, ValueEnum};

/// The supported sanitizers and dynamic-analysis tools.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    DrMemory,
    Valgrind,
    MemorySanitizer,
    AddressSanitizer,
    ThreadSanitizer,
    UndefinedBehaviorSanitizer,
}

impl Sanitizer {
    /// The CMake cache definition enabling this sanitizer.
    pub fn cmake_define(&self) -> &'static str {
        match self {
            Sanitizer::Valgrind => "-DADD_TARGET_VALGRIND=1",
            Sanitizer::DrMemory => "-DADD_TARGET_DR_MEMORY=1",
            Sanitizer::MemorySanitizer => "-DADD_TARGET_CLANG_MEMORY_SANITIZER=1",
            Sanitizer::AddressSanitizer => "-DADD_TARGET_CLANG_ADDRESS_SANITIZER=1",
            Sanitizer::ThreadSanitizer => "-DADD_TARGET_CLANG_THREAD_SANITIZER=1",
            Sanitizer::UndefinedBehaviorSanitizer => {
                "-DADD_TARGET_CLANG_UNDEFINED_BEHAVIOR_SANITIZER=1"
            }
        }
    }

    /// The user-facing name (as spelled on the command line).
    pub fn flag_name(&self) -> &'static str {
        match self {
            Sanitizer::DrMemory => "dr-memory",
            Sanitizer::Valgrind => "valgrind",
            Sanitizer::MemorySanitizer => "memory-sanitizer",
            Sanitizer::AddressSanitizer => "address-sanitizer",
            Sanitizer::ThreadSanitizer => "thread-sanitizer",
            Sanitizer::UndefinedBehaviorSanitizer => "undefined-behavior-sanitizer",
        }
    }

    /// Whether this sanitizer can run on the given host family.
    pub fn supported_on(&self, platform: &Platform) -> bool {
        match self {
            Sanitizer::DrMemory => platform.windows,
            _ => platform.linux || platform.macos,
        }
    }
}

/// # Sanitizer Options (`SanitizerOptions`)
///
/// The sanitizer option group, flattened into the subcommand argument
/// structs.
#[derive(Args, Debug, Default, Clone)]
pub struct SanitizerOptions {
    /// Memory sanitizer like: Dr. Memory, valgrind, or a clang sanitizer.
    #[arg(long, value_enum)]
    pub sanitizer: Option<Sanitizer>,
}

/// CMake cache definitions for the selected sanitizer, if any.
pub fn cmake_defines(cfg: &Config) -> Vec<String> {
    match cfg.sanitizer.sanitizer {
        Some(sanitizer) => vec![sanitizer.cmake_define().to_string()],
        None => Vec::new(),
    }
}
