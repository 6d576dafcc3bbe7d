//! Per-strategy candidate scorers.
//!
//! Similarity and mood scores are bounded to [0,1] whenever at least one
//! factor applies. Discovery and history scores are ranking-only values and
//! are not normalized. Every "skip if absent" decision is an explicit guard
//! on the optional field, so a degraded (empty) profile simply contributes
//! nothing instead of crashing or zeroing the mean.

use crate::features::{average_features, shared_similarity};
use crate::model::{AudioFeatures, Track, UserProfile, MOOD_DIMENSIONS};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Flat factor contributed when the candidate's artist is in the profile's
/// preferred-artist set.
pub const PREFERRED_ARTIST_BONUS: f64 = 0.3;

/// Maximum per-dimension distance for a track to "match" a target mood.
pub const MOOD_TOLERANCE: f64 = 0.3;

/// Popularity value the discovery scorer rewards most.
pub const IDEAL_DISCOVERY_POPULARITY: f64 = 0.4;

/// Release-recency window for the discovery bonus.
pub const DISCOVERY_RECENCY_DAYS: i64 = 365;

/// Last-played window for the history recency factor.
pub const HISTORY_RECENCY_DAYS: i64 = 30;

/// Shared context for similarity scoring: the seed set reduced to its
/// average feature vector and genre pool, plus the listener profile.
#[derive(Debug, Clone)]
pub struct SimilarityContext<'a> {
    seed_average: Option<AudioFeatures>,
    seed_genres: HashSet<String>,
    profile: &'a UserProfile,
}

impl<'a> SimilarityContext<'a> {
    /// Reduce a seed set once; the context is then reused for every
    /// candidate in the selection loop.
    #[must_use]
    pub fn new(seeds: &[Track], profile: &'a UserProfile) -> Self {
        let seed_genres = seeds
            .iter()
            .flat_map(|t| t.genres().iter().cloned())
            .collect();
        Self {
            seed_average: average_features(seeds),
            seed_genres,
            profile,
        }
    }
}

/// Similarity of a candidate to the seed set and profile, in [0,1].
///
/// Weighted blend of up to three factors, each contributing equally to the
/// mean: feature similarity against the seed average, genre-overlap ratio,
/// and a flat preferred-artist bonus. Factors without data are omitted from
/// the mean, not counted as zero. Returns 0 when nothing applies.
#[must_use]
pub fn similarity_score(track: &Track, ctx: &SimilarityContext<'_>) -> f64 {
    let mut factors = Vec::with_capacity(3);

    if let (Some(seed_avg), Some(features)) = (&ctx.seed_average, &track.audio_features) {
        if let Some(sim) = shared_similarity(features, seed_avg) {
            factors.push(sim);
        }
    }

    if let Some(overlap) = genre_overlap(track.genres(), &ctx.seed_genres) {
        factors.push(overlap);
    }

    if let Some(artist_id) = &track.artist.id {
        if ctx.profile.preferred_artists.contains(artist_id) {
            factors.push(PREFERRED_ARTIST_BONUS);
        }
    }

    mean_of(&factors)
}

/// Overlap ratio `|a ∩ b| / max(|a|, |b|)`, or `None` when either side is
/// empty (no evidence either way).
#[must_use]
pub fn genre_overlap(track_genres: &[String], pool: &HashSet<String>) -> Option<f64> {
    if track_genres.is_empty() || pool.is_empty() {
        return None;
    }
    let track_set: HashSet<&String> = track_genres.iter().collect();
    let shared = track_set.iter().filter(|g| pool.contains(g.as_str())).count();
    Some(shared as f64 / track_set.len().max(pool.len()) as f64)
}

/// Mood closeness in [0,1]: mean of `1 - |track[d] - target[d]|` over the
/// four mood dimensions present in both vectors. 0 when none are shared.
#[must_use]
pub fn mood_score(track: &Track, target: &AudioFeatures) -> f64 {
    let Some(features) = &track.audio_features else {
        return 0.0;
    };

    let mut sum = 0.0;
    let mut count = 0usize;
    for &dim in &MOOD_DIMENSIONS {
        if let (Some(value), Some(wanted)) = (features.get(dim), target.get(dim)) {
            sum += 1.0 - (value - wanted).abs();
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mood pre-filter: every target dimension the track defines must lie
/// within [`MOOD_TOLERANCE`] of the target. A track that defines none of
/// the target dimensions passes vacuously and is ranked last by
/// [`mood_score`] instead of being excluded here.
#[must_use]
pub fn matches_mood(track: &Track, target: &AudioFeatures) -> bool {
    let Some(features) = &track.audio_features else {
        return true;
    };

    MOOD_DIMENSIONS.iter().all(|&dim| {
        match (features.get(dim), target.get(dim)) {
            (Some(value), Some(wanted)) => (value - wanted).abs() <= MOOD_TOLERANCE,
            _ => true,
        }
    })
}

/// Discovery ranking score (not normalized).
///
/// `0.2 × |track genres ∩ preferred genres|` rewards genre affinity,
/// `0.3 × (1 − |popularity − 0.4|)` rewards moderate popularity, and a
/// release within the last 12 months earns up to 0.2 with linear decay.
#[must_use]
pub fn discovery_score(track: &Track, profile: &UserProfile, now: DateTime<Utc>) -> f64 {
    let genre_hits = track
        .genres()
        .iter()
        .filter(|g| profile.preferred_genres.contains(*g))
        .count();
    let mut score = 0.2 * genre_hits as f64;

    if let Some(popularity) = track.popularity {
        score += 0.3 * (1.0 - (popularity - IDEAL_DISCOVERY_POPULARITY).abs());
    }

    if let Some(release) = track.album.as_ref().and_then(|a| a.release_date) {
        let days = (now.date_naive() - release).num_days();
        if (0..DISCOVERY_RECENCY_DAYS).contains(&days) {
            score += 0.2 * (1.0 - days as f64 / DISCOVERY_RECENCY_DAYS as f64);
        }
    }

    score
}

/// History ranking score (not normalized).
///
/// `0.4 × min(play_count/10, 1) + 0.3 × completion + 0.3 × recency`, where
/// recency decays to zero 30 days after the last play. A track never played
/// gets no recency factor.
#[must_use]
pub fn history_score(track: &Track, now: DateTime<Utc>) -> f64 {
    let frequency = (f64::from(track.stats.play_count) / 10.0).min(1.0);
    let completion = track.stats.avg_completion_rate;

    let recency = match track.stats.last_played_at {
        Some(last) => {
            let days = (now - last).num_days();
            (1.0 - days as f64 / HISTORY_RECENCY_DAYS as f64).max(0.0)
        }
        None => 0.0,
    };

    0.4 * frequency + 0.3 * completion + 0.3 * recency
}

fn mean_of(factors: &[f64]) -> f64 {
    if factors.is_empty() {
        0.0
    } else {
        factors.iter().sum::<f64>() / factors.len() as f64
    }
}
