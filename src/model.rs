//! Core data model: tracks, profiles, and generated playlists.
//!
//! Catalog [`Track`]s are immutable inputs. The engine never mutates them;
//! when a track ends up in a playlist it is copied into a [`PlaylistEntry`]
//! which adds the position and transition score.
//!
//! All audio-feature partiality is explicit: every dimension is an
//! independent `Option`, and the scorers guard on absence rather than
//! defaulting to zero.

use crate::rules::GenerationRules;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The fixed set of mean-comparable feature dimensions.
///
/// `tempo` is deliberately absent: it is measured in BPM, not [0,1], and is
/// compared on its own 50-BPM scale during transition scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureDimension {
    Energy,
    Valence,
    Danceability,
    Acousticness,
    Instrumentalness,
}

/// All mean-comparable dimensions, in a fixed order.
pub const MEAN_DIMENSIONS: [FeatureDimension; 5] = [
    FeatureDimension::Energy,
    FeatureDimension::Valence,
    FeatureDimension::Danceability,
    FeatureDimension::Acousticness,
    FeatureDimension::Instrumentalness,
];

/// The dimensions a mood target is matched against.
pub const MOOD_DIMENSIONS: [FeatureDimension; 4] = [
    FeatureDimension::Valence,
    FeatureDimension::Energy,
    FeatureDimension::Danceability,
    FeatureDimension::Acousticness,
];

/// Pre-computed audio features for a track, each present-or-absent
/// independently. Non-tempo values are normalized to [0,1] upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub danceability: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    /// Beats per minute. Compared on a 50-BPM scale, never averaged with
    /// the [0,1] dimensions.
    pub tempo: Option<f64>,
}

impl AudioFeatures {
    /// Value of a single mean-comparable dimension, if present.
    #[must_use]
    pub fn get(&self, dim: FeatureDimension) -> Option<f64> {
        match dim {
            FeatureDimension::Energy => self.energy,
            FeatureDimension::Valence => self.valence,
            FeatureDimension::Danceability => self.danceability,
            FeatureDimension::Acousticness => self.acousticness,
            FeatureDimension::Instrumentalness => self.instrumentalness,
        }
    }

    fn set(&mut self, dim: FeatureDimension, value: f64) {
        match dim {
            FeatureDimension::Energy => self.energy = Some(value),
            FeatureDimension::Valence => self.valence = Some(value),
            FeatureDimension::Danceability => self.danceability = Some(value),
            FeatureDimension::Acousticness => self.acousticness = Some(value),
            FeatureDimension::Instrumentalness => self.instrumentalness = Some(value),
        }
    }

    /// Build a feature vector from `(dimension, value)` pairs.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (FeatureDimension, f64)>) -> Self {
        let mut features = Self::default();
        for (dim, value) in pairs {
            features.set(dim, value);
        }
        features
    }

    /// True if no dimension (tempo included) carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        MEAN_DIMENSIONS.iter().all(|&d| self.get(d).is_none()) && self.tempo.is_none()
    }
}

/// Artist identity attached to a track or profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    /// Source-side artist id; may be absent for loose metadata.
    pub id: Option<String>,
    pub name: String,
    /// Genre labels, lower-cased by the catalog source.
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Album identity attached to a track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub title: String,
    pub release_date: Option<NaiveDate>,
}

/// Listening statistics accumulated by the catalog source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayStats {
    pub play_count: u32,
    /// Fraction of plays that were skipped, in [0,1].
    pub skip_ratio: f64,
    /// Average fraction of the track listened through, in [0,1].
    pub avg_completion_rate: f64,
    pub last_played_at: Option<DateTime<Utc>>,
}

/// One candidate track from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: ArtistRef,
    pub album: Option<AlbumRef>,
    pub duration_ms: u64,
    pub audio_features: Option<AudioFeatures>,
    /// Source-dependent popularity, normalized to [0,1].
    pub popularity: Option<f64>,
    #[serde(default)]
    pub stats: PlayStats,
}

impl Track {
    /// Genre labels of the track's artist.
    #[must_use]
    pub fn genres(&self) -> &[String] {
        &self.artist.genres
    }

    /// Skip-ratio gate used by `avoid_skipped_tracks`.
    #[must_use]
    pub fn is_frequently_skipped(&self) -> bool {
        self.stats.skip_ratio > 0.5
    }
}

/// A listener's musical profile, built once per generation call from
/// listening history. Read-only within the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Most-played first.
    #[serde(default)]
    pub top_tracks: Vec<Track>,
    #[serde(default)]
    pub top_artists: Vec<ArtistRef>,
    #[serde(default)]
    pub preferred_genres: HashSet<String>,
    /// Artist ids the listener favors.
    #[serde(default)]
    pub preferred_artists: HashSet<String>,
    #[serde(default)]
    pub listened_track_ids: HashSet<String>,
    pub avg_audio_features: Option<AudioFeatures>,
}

impl UserProfile {
    /// The degraded profile substituted when the profile provider fails.
    /// Scoring against it never crashes; it just contributes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// The closed set of generation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Similarity,
    Mood,
    Genre,
    Tempo,
    Discovery,
    History,
    Hybrid,
}

impl Algorithm {
    /// Parse an algorithm name, falling back to [`Algorithm::Hybrid`] for
    /// anything unrecognized. The fallback is logged, never surfaced.
    #[must_use]
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "similarity" => Self::Similarity,
            "mood" => Self::Mood,
            "genre" => Self::Genre,
            "tempo" => Self::Tempo,
            "discovery" => Self::Discovery,
            "history" => Self::History,
            "hybrid" => Self::Hybrid,
            other => {
                log::warn!("Unknown algorithm '{other}', falling back to hybrid");
                Self::Hybrid
            }
        }
    }

    /// Stable lower-case tag used in playlist output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Similarity => "similarity",
            Self::Mood => "mood",
            Self::Genre => "genre",
            Self::Tempo => "tempo",
            Self::Discovery => "discovery",
            Self::History => "history",
            Self::Hybrid => "hybrid",
        }
    }

    /// Fixed human-readable description attached to generated playlists.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Similarity => "Tracks similar to your seeds and favorites",
            Self::Mood => "Tracks matching your target mood",
            Self::Genre => "Tracks from your preferred genres",
            Self::Tempo => "Tracks around your target tempo",
            Self::Discovery => "Fresh tracks outside your usual rotation",
            Self::History => "Tracks you keep coming back to",
            Self::Hybrid => "A blend of similar, mood, discovery and history picks",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A track placed in a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(flatten)]
    pub track: Track,
    /// Contiguous 1-based index matching playlist order.
    pub position: usize,
    /// Transition score against the immediately preceding entry.
    /// `None` for the first track.
    pub transition_score: Option<f64>,
}

/// Aggregate metadata attached to a generated playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistMetadata {
    pub generated_at: DateTime<Utc>,
    pub rules: GenerationRules,
    /// Seed track ids actually used (after defaulting to profile top tracks).
    pub seed_track_ids: Vec<String>,
    pub total_duration_ms: u64,
    pub track_count: usize,
    /// Count of distinct non-null artist ids.
    pub unique_artists: usize,
    pub generation_ms: u64,
}

/// A generated playlist. Created fresh per call and owned entirely by the
/// caller once returned; the engine holds no reference afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub algorithm: Algorithm,
    pub tracks: Vec<PlaylistEntry>,
    pub metadata: PlaylistMetadata,
}
