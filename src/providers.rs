//! File-backed providers for offline use.
//!
//! The engine only sees the [`ProfileProvider`]/[`CatalogProvider`] traits;
//! these implementations read JSON documents from disk so the CLI works
//! against exported catalogs without any service in front of it. The
//! documents are read once at construction, so repeated generation calls
//! never touch the filesystem.

use crate::engine::{CatalogProvider, ProfileProvider};
use crate::model::{Track, UserProfile};
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Catalog provider backed by a JSON array of tracks.
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    tracks: Vec<Track>,
}

impl JsonCatalogProvider {
    /// Load a catalog document (a JSON array of tracks).
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse as a track
    /// array; this surfaces as a fatal catalog error at generation time,
    /// so the CLI reports it before doing any scoring work.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let tracks: Vec<Track> = serde_json::from_str(&raw)
            .with_context(|| format!("Catalog file {} is not a track array", path.display()))?;
        info!("Loaded {} tracks from {}", tracks.len(), path.display());
        Ok(Self { tracks })
    }

    /// Wrap an in-memory catalog, mainly for tests and library callers.
    #[must_use]
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

impl CatalogProvider for JsonCatalogProvider {
    fn available_tracks(&self, _user_id: &str) -> Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}

/// Profile provider backed by a JSON profile document.
///
/// A missing or malformed file makes `user_profile` fail, which the engine
/// recovers from by generating against the empty profile.
#[derive(Debug, Clone, Default)]
pub struct JsonProfileProvider {
    profile: Option<UserProfile>,
}

impl JsonProfileProvider {
    /// Load a profile document.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed. Callers that want the
    /// degraded-profile behavior can simply use [`JsonProfileProvider::default`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        let profile: UserProfile = serde_json::from_str(&raw)
            .with_context(|| format!("Profile file {} is not a profile document", path.display()))?;
        info!(
            "Loaded profile from {} ({} top tracks, {} preferred genres)",
            path.display(),
            profile.top_tracks.len(),
            profile.preferred_genres.len()
        );
        Ok(Self {
            profile: Some(profile),
        })
    }

    #[must_use]
    pub fn from_profile(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }
}

impl ProfileProvider for JsonProfileProvider {
    fn user_profile(&self, user_id: &str) -> Result<UserProfile> {
        self.profile
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No profile loaded for user '{user_id}'"))
    }
}
