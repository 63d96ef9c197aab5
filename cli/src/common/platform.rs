//! # BldRS Host Platform Probe (`common::platform`)
//!
//! File: cli/src/common/platform.rs
//!
//! ## Overview
//!
//! This module determines the host operating-system family once per process
//! and caches the result. Several parts of the tool branch on the family:
//! the process runner invokes commands through `cmd /C` on Windows, the
//! sanitizer translator restricts its choices per platform, and the benchmark
//! report prefixes executables with `./` on POSIX hosts.
//!
//! ## Architecture
//!
//! - `Platform`: three mutually exclusive booleans (`windows`, `linux`,
//!   `macos`); an unrecognized family yields all-false plus one logged warning.
//! - `Platform::from_os_name`: the pure mapping from the OS family name,
//!   directly testable.
//! - `current()`: the memoized accessor. The value is computed at most once
//!   per process via `OnceLock` and lives for the process lifetime — the host
//!   does not change while we run, so there is no teardown or invalidation.
//!
//! ## Examples
//!
//! ```rust
//! let platform = platform::current();
//! if platform.windows {
//!     // invoke through the platform shell
//! }
//! ```
//!
use std::sync::OnceLock;
use tracing::warn;

/// The host operating-system family. At most one field is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    pub windows: bool,
    pub linux: bool,
    pub macos: bool,
}

impl Platform {
    /// Map an OS family name (as reported by `std::env::consts::OS`) to a
    /// `Platform`. Unrecognized families yield all-false and a logged warning.
    pub fn from_os_name(os: &str) -> Platform {
        match os {
            "windows" => Platform {
                windows: true,
                ..Default::default()
            },
            "linux" => Platform {
                linux: true,
                ..Default::default()
            },
            "macos" => Platform {
                macos: true,
                ..Default::default()
            },
            other => {
                warn!("Unidentified operating system family: {}", other);
                Platform::default()
            }
        }
    }
}

// Process-wide cache; write-once-read-many, never recomputed.
static PLATFORM: OnceLock<Platform> = OnceLock::new();

#[cfg(test)]
static PROBE_CALLS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Query the operating system for its family name. Counted in tests so the
/// memoization guarantee (at most one underlying query) is observable.
fn probe() -> Platform {
    #[cfg(test)]
    PROBE_CALLS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    Platform::from_os_name(std::env::consts::OS)
}

/// The host platform, computed on first access and cached for the life of
/// the process.
pub fn current() -> Platform {
    *PLATFORM.get_or_init(probe)
}
