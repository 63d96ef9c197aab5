//! # BldRS Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used throughout
//! the BldRS application. It provides a consistent approach to error management
//! with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `BldrsError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error variants map directly onto the failure taxonomy of the tool:
//! - `Config`: bad or inconsistent configuration (user must fix, never retried)
//! - `FileSystem`: missing working directory, unwritable output path
//! - `Launch`: a child process could not be created at all (missing executable,
//!   permission denied) — distinct from a child that ran and exited non-zero,
//!   which is a normal outcome returned as data by the process runner
//! - `Download`: the auxiliary script fetch returned a non-success status
//!
//! ## Examples
//!
//! Using the error system:
//!
//! ```rust
//! // Return a specific error type
//! if !path.is_dir() {
//!     anyhow::bail!(BldrsError::FileSystem(format!("Not a directory: {}", path.display())));
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the BldRS application.
#[derive(Error, Debug)]
pub enum BldrsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Download of '{url}' failed: {reason}")]
    Download { url: String, reason: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = BldrsError::Config("Unknown profile 'Fastest'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Unknown profile 'Fastest'"
        );

        let fs_err = BldrsError::FileSystem("Working directory does not exist".to_string());
        assert_eq!(
            fs_err.to_string(),
            "Filesystem error: Working directory does not exist"
        );

        let download_err = BldrsError::Download {
            url: "https://example.com/AddTarget.cmake".into(),
            reason: "status 404".into(),
        };
        assert_eq!(
            download_err.to_string(),
            "Download of 'https://example.com/AddTarget.cmake' failed: status 404"
        );
    }

    #[test]
    fn test_launch_error_preserves_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let launch = BldrsError::Launch {
            program: "cmake".into(),
            source: io_err,
        };
        let msg = launch.to_string();
        assert!(msg.contains("cmake"));
        assert!(msg.contains("no such file"));
    }
}
