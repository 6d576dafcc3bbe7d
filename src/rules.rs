//! Declarative constraints applied during track selection.
//!
//! Every builder consults the same [`GenerationRules`] value. Callers supply
//! a sparse [`RuleOverrides`] which is merged over the defaults key by key,
//! so leaving a field out always means "use the default", never "disable".

use serde::{Deserialize, Serialize};

/// Fully-resolved generation rules, as used by the selection loops.
///
/// `target_duration_ms`, `diversity_factor` and `include_recent_discoveries`
/// are informational: they travel with the playlist metadata but do not
/// constrain selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRules {
    /// Minimum similarity score a candidate must exceed before the
    /// similarity builder will take it.
    pub min_similarity: f64,
    /// Maximum number of tracks per artist in one playlist.
    pub max_repeat_artist: usize,
    /// Requested total playlist duration. Informational only.
    pub target_duration_ms: Option<u64>,
    /// When set, candidates with a skip ratio above 0.5 are excluded.
    pub avoid_skipped_tracks: bool,
    /// Informational diversity knob carried through to metadata.
    pub diversity_factor: f64,
    /// Informational discovery knob carried through to metadata.
    pub include_recent_discoveries: bool,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            min_similarity: 0.7,
            max_repeat_artist: 2,
            target_duration_ms: None,
            avoid_skipped_tracks: false,
            diversity_factor: 0.5,
            include_recent_discoveries: false,
        }
    }
}

/// Caller-supplied partial rules. Any `Some` field wins over the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleOverrides {
    pub min_similarity: Option<f64>,
    pub max_repeat_artist: Option<usize>,
    pub target_duration_ms: Option<u64>,
    pub avoid_skipped_tracks: Option<bool>,
    pub diversity_factor: Option<f64>,
    pub include_recent_discoveries: Option<bool>,
}

impl RuleOverrides {
    /// Merge these overrides over the default rules, key by key.
    #[must_use]
    pub fn resolve(&self) -> GenerationRules {
        let base = GenerationRules::default();
        GenerationRules {
            min_similarity: self.min_similarity.unwrap_or(base.min_similarity),
            max_repeat_artist: self.max_repeat_artist.unwrap_or(base.max_repeat_artist),
            target_duration_ms: self.target_duration_ms.or(base.target_duration_ms),
            avoid_skipped_tracks: self
                .avoid_skipped_tracks
                .unwrap_or(base.avoid_skipped_tracks),
            diversity_factor: self.diversity_factor.unwrap_or(base.diversity_factor),
            include_recent_discoveries: self
                .include_recent_discoveries
                .unwrap_or(base.include_recent_discoveries),
        }
    }
}
