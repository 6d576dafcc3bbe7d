//! Configuration and data directory management.
//!
//! Medley stores its exported catalog and profile documents in the
//! platform-standard data directory:
//! - Linux: `~/.local/share/medley/`
//! - macOS: `~/Library/Application Support/medley/`
//! - Windows: `%APPDATA%\medley\`
//!
//! The CLI falls back to these locations when `--catalog`/`--profile` are
//! not given, so a one-time export is enough for day-to-day use.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Returns the platform-appropriate Medley data directory, creating it if
/// necessary.
///
/// # Errors
///
/// Fails when the system data directory cannot be determined or the
/// `medley` subdirectory cannot be created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        )
    })?;

    let medley_dir = data_dir.join("medley");
    fs::create_dir_all(&medley_dir).with_context(|| {
        format!(
            "Failed to create Medley data directory at {}. Please check file permissions.",
            medley_dir.display()
        )
    })?;

    Ok(medley_dir)
}

/// Default location of the catalog document (`catalog.json`).
///
/// # Errors
///
/// Propagates [`get_data_dir`] failures.
pub fn default_catalog_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("catalog.json"))
}

/// Default location of the profile document (`profile.json`).
///
/// # Errors
///
/// Propagates [`get_data_dir`] failures.
pub fn default_profile_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("profile.json"))
}
