//! # BldRS Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! This module serves as the root and organizational entry point for the
//! shared utility modules used throughout the BldRS CLI application. It
//! aggregates the cross-cutting concerns: process execution, host platform
//! detection, and the one network operation the tool performs.
//!
//! By centralizing these utilities under the `common::` namespace, BldRS
//! keeps command-specific logic (`commands::`), the pipeline (`pipeline::`),
//! and core infrastructure (`core::`) cleanly separated from plumbing.
//!
//! ## Architecture
//!
//! The `common` module itself primarily consists of declarations (`pub mod`)
//! for its submodules. Each submodule encapsulates a specific domain:
//!
//! - **`process`**: The shared execution primitive — launch an external
//!   command, stream its combined output, return the exit status. Every
//!   pipeline step goes through it.
//! - **`platform`**: The memoized host operating-system family probe.
//! - **`net`**: Downloading the `AddTarget.cmake` helper script.
//!

/// Downloading the auxiliary CMake helper script.
pub mod net;
/// Memoized host operating-system family probe.
pub mod platform;
/// The shared external-process execution primitive.
pub mod process;
