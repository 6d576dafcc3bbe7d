//! Playlist assembly and algorithm dispatch.
//!
//! [`PlaylistEngine`] is the single entry point: it reads the listener
//! profile and the candidate catalog from the injected providers, routes to
//! the requested strategy, runs the sequence optimizer, and assembles the
//! final [`Playlist`] with positions, transition scores and aggregate
//! metadata. Each call is one side-effect-free pass over call-local state,
//! so concurrent generations are safe as long as the providers are
//! read-only.
//!
//! Only catalog failures are fatal. A failed profile fetch degrades to the
//! empty profile and an unknown algorithm name falls back to hybrid; both
//! are logged and never surfaced.

use crate::blend::{interleave, split_buckets};
use crate::builder::{
    build_discovery, build_genre, build_history, build_mood, build_similarity, build_tempo,
    DEFAULT_SEED_COUNT,
};
use crate::features::average_features;
use crate::model::{
    Algorithm, AudioFeatures, Playlist, PlaylistEntry, PlaylistMetadata, Track, UserProfile,
};
use crate::optimizer::{optimize_sequence, transition_score};
use crate::rules::RuleOverrides;
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Instant;
use thiserror::Error;

/// Playlist size used when the caller does not ask for one.
pub const DEFAULT_TARGET_SIZE: usize = 30;

/// Hard cap on catalog size, bounding the O(n²) optimizer and the
/// O(n·target) similarity builder. Excess tail is dropped with a warning.
pub const MAX_CATALOG_SIZE: usize = 5000;

/// Supplies the listener's musical profile.
///
/// Failures are recovered inside the engine by substituting
/// [`UserProfile::empty`], so implementations may fail freely.
pub trait ProfileProvider {
    fn user_profile(&self, user_id: &str) -> anyhow::Result<UserProfile>;
}

/// Supplies the candidate track catalog. Failure, or an empty catalog, is
/// fatal to the generation call.
pub trait CatalogProvider {
    fn available_tracks(&self, user_id: &str) -> anyhow::Result<Vec<Track>>;
}

/// Source of playlist identifiers. Injected so tests can pin ids; the
/// default is a fresh UUID per playlist.
pub trait IdSource {
    fn playlist_id(&self) -> String;
}

/// Default [`IdSource`]: random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn playlist_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Errors surfaced by [`PlaylistEngine::generate`].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The catalog provider returned zero tracks. Fatal, no retry.
    #[error("track catalog is empty for user '{user_id}'")]
    EmptyCatalog { user_id: String },

    /// The catalog provider itself failed.
    #[error("failed to fetch track catalog")]
    Catalog(#[source] anyhow::Error),
}

/// One playlist-generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub user_id: String,
    pub algorithm: Algorithm,
    /// Ids of seed tracks, resolved against the catalog. When empty the
    /// profile's top tracks are used instead.
    pub seed_track_ids: Vec<String>,
    /// Seed artist names; currently feeds playlist naming.
    pub seed_artists: Vec<String>,
    /// Seed genre labels; feeds the genre strategy and playlist naming.
    pub seed_genres: Vec<String>,
    /// Target mood vector. Defaults to the profile's average features.
    pub mood_target: Option<AudioFeatures>,
    pub rules: RuleOverrides,
    pub target_size: usize,
}

impl GenerateRequest {
    /// A hybrid request with default rules and target size.
    #[must_use]
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            algorithm: Algorithm::Hybrid,
            seed_track_ids: Vec::new(),
            seed_artists: Vec::new(),
            seed_genres: Vec::new(),
            mood_target: None,
            rules: RuleOverrides::default(),
            target_size: DEFAULT_TARGET_SIZE,
        }
    }
}

/// The playlist generation engine.
///
/// Holds the two data providers and the id source; all per-call working
/// state (used-id sets, artist counts, segments) lives on the stack of
/// [`PlaylistEngine::generate`].
pub struct PlaylistEngine<P, C> {
    profile_provider: P,
    catalog_provider: C,
    ids: Box<dyn IdSource + Send + Sync>,
}

impl<P: ProfileProvider, C: CatalogProvider> PlaylistEngine<P, C> {
    #[must_use]
    pub fn new(profile_provider: P, catalog_provider: C) -> Self {
        Self {
            profile_provider,
            catalog_provider,
            ids: Box::new(UuidSource),
        }
    }

    /// Replace the id source, e.g. with a fixed one for golden tests.
    #[must_use]
    pub fn with_id_source(mut self, ids: impl IdSource + Send + Sync + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Generate one playlist.
    ///
    /// The two provider reads happen sequentially before any scoring.
    /// Builders may return fewer tracks than requested when the rules
    /// exhaust the eligible pool; that is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Fails only when the catalog cannot be fetched or is empty.
    pub fn generate(&self, request: &GenerateRequest) -> Result<Playlist, GenerateError> {
        let started = Instant::now();

        let profile = match self.profile_provider.user_profile(&request.user_id) {
            Ok(profile) => profile,
            Err(err) => {
                warn!(
                    "Profile unavailable for '{}', generating from empty profile: {err:#}",
                    request.user_id
                );
                UserProfile::empty()
            }
        };

        let mut catalog = self
            .catalog_provider
            .available_tracks(&request.user_id)
            .map_err(GenerateError::Catalog)?;
        if catalog.is_empty() {
            return Err(GenerateError::EmptyCatalog {
                user_id: request.user_id.clone(),
            });
        }
        if catalog.len() > MAX_CATALOG_SIZE {
            warn!(
                "Catalog of {} tracks exceeds the {MAX_CATALOG_SIZE} cap, truncating",
                catalog.len()
            );
            catalog.truncate(MAX_CATALOG_SIZE);
        }

        let rules = request.rules.resolve();
        let now = Utc::now();
        let seeds = resolve_seeds(request, &catalog, &profile);
        let mood_target = request
            .mood_target
            .clone()
            .or_else(|| profile.avg_audio_features.clone())
            .unwrap_or_default();

        debug!(
            "Generating '{}' playlist for '{}': {} candidates, {} seeds, target {}",
            request.algorithm,
            request.user_id,
            catalog.len(),
            seeds.len(),
            request.target_size
        );

        let picked = match request.algorithm {
            Algorithm::Similarity => {
                build_similarity(&catalog, &profile, &seeds, &rules, request.target_size)
            }
            Algorithm::Mood => build_mood(&catalog, &mood_target, &rules, request.target_size),
            Algorithm::Genre => build_genre(
                &catalog,
                &profile,
                &request.seed_genres,
                &rules,
                request.target_size,
            ),
            Algorithm::Tempo => {
                let reference = mood_target
                    .tempo
                    .or_else(|| average_features(&seeds).and_then(|f| f.tempo));
                build_tempo(&catalog, reference, &rules, request.target_size)
            }
            Algorithm::Discovery => {
                build_discovery(&catalog, &profile, &rules, request.target_size, now)
            }
            Algorithm::History => build_history(&catalog, &rules, request.target_size, now),
            Algorithm::Hybrid => {
                let [sim, mood, discovery, history] = split_buckets(request.target_size);
                let mut segments = Vec::with_capacity(4);
                // Builders run with independent selection state; a track
                // picked by two strategies stays duplicated after the
                // interleave.
                if sim > 0 {
                    segments.push(build_similarity(&catalog, &profile, &seeds, &rules, sim));
                }
                if mood > 0 {
                    segments.push(build_mood(&catalog, &mood_target, &rules, mood));
                }
                if discovery > 0 {
                    segments.push(build_discovery(&catalog, &profile, &rules, discovery, now));
                }
                if history > 0 {
                    segments.push(build_history(&catalog, &rules, history, now));
                }
                interleave(&segments)
            }
        };

        let sequenced = optimize_sequence(picked);
        let entries = assemble_entries(sequenced);

        let total_duration_ms = entries.iter().map(|e| e.track.duration_ms).sum();
        let unique_artists = entries
            .iter()
            .filter_map(|e| e.track.artist.id.as_deref())
            .collect::<HashSet<_>>()
            .len();

        let playlist = Playlist {
            id: self.ids.playlist_id(),
            name: playlist_name(request, &seeds),
            description: request.algorithm.description().to_string(),
            algorithm: request.algorithm,
            metadata: PlaylistMetadata {
                generated_at: now,
                rules,
                seed_track_ids: seeds.iter().map(|t| t.id.clone()).collect(),
                total_duration_ms,
                track_count: entries.len(),
                unique_artists,
                generation_ms: started.elapsed().as_millis() as u64,
            },
            tracks: entries,
        };

        info!(
            "Generated playlist '{}' with {} tracks in {}ms",
            playlist.name, playlist.metadata.track_count, playlist.metadata.generation_ms
        );
        Ok(playlist)
    }
}

/// Resolve seed track ids against the catalog, defaulting to the profile's
/// top tracks when the caller supplied none. Unknown ids are skipped.
fn resolve_seeds(request: &GenerateRequest, catalog: &[Track], profile: &UserProfile) -> Vec<Track> {
    if request.seed_track_ids.is_empty() {
        return profile
            .top_tracks
            .iter()
            .take(DEFAULT_SEED_COUNT)
            .cloned()
            .collect();
    }

    request
        .seed_track_ids
        .iter()
        .filter_map(|id| {
            let found = catalog.iter().find(|t| &t.id == id);
            if found.is_none() {
                warn!("Seed track '{id}' not found in catalog, skipping");
            }
            found.cloned()
        })
        .collect()
}

/// Positions are 1-based and contiguous; transition scores are recomputed
/// against the final order, not reused from the optimizer's internal pass.
fn assemble_entries(tracks: Vec<Track>) -> Vec<PlaylistEntry> {
    let mut entries: Vec<PlaylistEntry> = Vec::with_capacity(tracks.len());
    for (index, track) in tracks.into_iter().enumerate() {
        let score = entries
            .last()
            .map(|prev: &PlaylistEntry| transition_score(&prev.track, &track));
        entries.push(PlaylistEntry {
            track,
            position: index + 1,
            transition_score: score,
        });
    }
    entries
}

/// Derive a playlist name from the seed artist, seed genre, or the
/// algorithm label, in that order of preference.
fn playlist_name(request: &GenerateRequest, seeds: &[Track]) -> String {
    if let Some(artist) = request.seed_artists.first() {
        return format!("{artist} Mix");
    }
    if let Some(seed) = seeds.first() {
        if !seed.artist.name.is_empty() {
            return format!("{} Mix", seed.artist.name);
        }
    }
    if let Some(genre) = request.seed_genres.first() {
        return format!("{genre} Mix");
    }
    format!("{} Mix", capitalize(request.algorithm.label()))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
