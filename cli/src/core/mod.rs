//! # BldRS Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components that provide
//! foundational functionality for the BldRS application. These components
//! handle configuration and error management.
//!
//! ## Architecture
//!
//! The core infrastructure consists of two key components:
//! - `config`: The configuration record (all parsed options), file-based
//!   defaults loading, merging, and validation
//! - `error`: Error types and error handling utilities
//!
//! These components provide essential infrastructure that's used by
//! the command modules and the pipeline to implement their functionality.
//!
//! ## Usage
//!
//! Core infrastructure is imported by command handlers:
//!
//! ```rust
//! use crate::core::config::Config; // The per-invocation configuration record
//! use crate::core::error::{BldrsError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
