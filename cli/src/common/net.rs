//! # BldRS Network Utilities (`common::net`)
//!
//! File: cli/src/common/net.rs
//!
//! ## Overview
//!
//! This module holds the one piece of network functionality the tool needs:
//! downloading the `AddTarget.cmake` helper script the generate step expects
//! to find in the build tree. The download is a single blocking GET via
//! `ureq`; there is nothing asynchronous anywhere in this tool.
//!
//! A failed download is reported as `BldrsError::Download`. The caller (the
//! generate step) treats that as non-fatal: if the script already exists
//! locally from a prior run the pipeline continues, otherwise the subsequent
//! configure step is expected to fail on its own.
//!
use crate::core::error::{BldrsError, Result};
use anyhow::Context;
use std::{fs::File, path::Path};
use tracing::{error, info};

/// # Download a Script (`download_script`)
///
/// Fetch `url` and write the body to `output_path`, truncating any previous
/// content. The file handle is scoped to this function and closed on every
/// exit path.
///
/// ## Errors
///
/// - `BldrsError::Download` for transport errors or non-success HTTP status.
/// - I/O errors while creating or writing the destination file.
pub fn download_script(url: &str, output_path: &Path) -> Result<()> {
    let response = ureq::get(url).call().map_err(|e| {
        error!(
            "Downloading {} to {} FAILED",
            url,
            output_path.display()
        );
        BldrsError::Download {
            url: url.to_string(),
            reason: e.to_string(),
        }
    })?;

    info!("Downloading {} to {}", url, output_path.display());
    let mut file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    std::io::copy(&mut response.into_reader(), &mut file)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}
