//! Single-strategy playlist builders.
//!
//! Every builder enforces the same eligibility rules through a call-scoped
//! [`SelectionState`]: no track id twice, no artist above the repeat cap,
//! and no frequently-skipped tracks when the rules ask for that. When the
//! eligible pool runs dry a builder simply returns fewer tracks than
//! requested; it never pads with disallowed tracks.
//!
//! The similarity builder re-scans the remaining pool every iteration
//! (O(n·target)). The mood, discovery, history, genre and tempo builders
//! score the whole pool once, sort descending, and walk the sorted list
//! (O(n log n)). Equal scores keep catalog order thanks to the stable sort.

use crate::features::TEMPO_SCALE_BPM;
use crate::model::{AudioFeatures, Track, UserProfile};
use crate::rules::GenerationRules;
use crate::scoring::{
    self, discovery_score, history_score, matches_mood, mood_score, similarity_score,
    SimilarityContext,
};
use chrono::{DateTime, Utc};
use log::{debug, trace};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// How many profile top tracks seed the similarity builder when the caller
/// supplies no seeds.
pub const DEFAULT_SEED_COUNT: usize = 5;

/// Call-scoped selection bookkeeping: the used-id set and per-artist counts
/// that every builder maintains while it fills a playlist.
#[derive(Debug, Default)]
pub struct SelectionState {
    used_ids: HashSet<String>,
    artist_counts: HashMap<String, usize>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the track passes the used-id, artist-cap and skip checks.
    #[must_use]
    pub fn admits(&self, track: &Track, rules: &GenerationRules) -> bool {
        if self.used_ids.contains(&track.id) {
            return false;
        }
        if self.artist_count(track) >= rules.max_repeat_artist {
            return false;
        }
        if rules.avoid_skipped_tracks && track.is_frequently_skipped() {
            return false;
        }
        true
    }

    /// Record a selected track.
    pub fn commit(&mut self, track: &Track) {
        self.used_ids.insert(track.id.clone());
        *self
            .artist_counts
            .entry(artist_key(track).to_string())
            .or_insert(0) += 1;
    }

    fn artist_count(&self, track: &Track) -> usize {
        self.artist_counts.get(artist_key(track)).copied().unwrap_or(0)
    }
}

/// Artists are capped by id when they have one, by name otherwise.
fn artist_key(track: &Track) -> &str {
    track.artist.id.as_deref().unwrap_or(&track.artist.name)
}

/// Similarity strategy: greedy iterative selection.
///
/// Seeds default to the profile's top [`DEFAULT_SEED_COUNT`] tracks when the
/// caller supplies none. Each iteration re-scans the eligible remainder,
/// picks the single highest-scoring candidate that also beats
/// `rules.min_similarity`, and commits it. Terminates early when no
/// candidate qualifies.
#[must_use]
pub fn build_similarity(
    catalog: &[Track],
    profile: &UserProfile,
    seeds: &[Track],
    rules: &GenerationRules,
    target_size: usize,
) -> Vec<Track> {
    let default_seeds: Vec<Track>;
    let seeds = if seeds.is_empty() {
        default_seeds = profile
            .top_tracks
            .iter()
            .take(DEFAULT_SEED_COUNT)
            .cloned()
            .collect();
        &default_seeds
    } else {
        seeds
    };

    let ctx = SimilarityContext::new(seeds, profile);
    let mut state = SelectionState::new();
    let mut selected = Vec::with_capacity(target_size);

    while selected.len() < target_size {
        let best = catalog
            .iter()
            .filter(|t| state.admits(t, rules))
            .map(|t| (t, similarity_score(t, &ctx)))
            .filter(|(_, score)| *score > rules.min_similarity)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((track, score)) => {
                trace!("Similarity pick {} ({score:.3})", track.id);
                state.commit(track);
                selected.push(track.clone());
            }
            None => break,
        }
    }

    if selected.len() < target_size {
        debug!(
            "Similarity builder stopped at {}/{target_size} eligible tracks",
            selected.len()
        );
    }
    selected
}

/// Mood strategy: pre-filter on mood match, then one sorted walk.
#[must_use]
pub fn build_mood(
    catalog: &[Track],
    target_mood: &AudioFeatures,
    rules: &GenerationRules,
    target_size: usize,
) -> Vec<Track> {
    let pool: Vec<&Track> = catalog
        .iter()
        .filter(|t| matches_mood(t, target_mood))
        .collect();
    select_ranked(&pool, rules, target_size, "mood", |t| {
        mood_score(t, target_mood)
    })
}

/// Discovery strategy: one sorted walk over discovery scores.
#[must_use]
pub fn build_discovery(
    catalog: &[Track],
    profile: &UserProfile,
    rules: &GenerationRules,
    target_size: usize,
    now: DateTime<Utc>,
) -> Vec<Track> {
    let pool: Vec<&Track> = catalog.iter().collect();
    select_ranked(&pool, rules, target_size, "discovery", |t| {
        discovery_score(t, profile, now)
    })
}

/// History strategy: one sorted walk over history scores.
#[must_use]
pub fn build_history(
    catalog: &[Track],
    rules: &GenerationRules,
    target_size: usize,
    now: DateTime<Utc>,
) -> Vec<Track> {
    let pool: Vec<&Track> = catalog.iter().collect();
    select_ranked(&pool, rules, target_size, "history", |t| {
        history_score(t, now)
    })
}

/// Genre strategy: ranks by genre overlap against the caller's seed genres
/// joined with the profile's preferred genres. Tracks with no overlap at
/// all are dropped in the pre-filter.
#[must_use]
pub fn build_genre(
    catalog: &[Track],
    profile: &UserProfile,
    seed_genres: &[String],
    rules: &GenerationRules,
    target_size: usize,
) -> Vec<Track> {
    let pool_genres: HashSet<String> = seed_genres
        .iter()
        .cloned()
        .chain(profile.preferred_genres.iter().cloned())
        .collect();

    let pool: Vec<&Track> = catalog
        .iter()
        .filter(|t| {
            scoring::genre_overlap(t.genres(), &pool_genres)
                .map(|o| o > 0.0)
                .unwrap_or(false)
        })
        .collect();
    select_ranked(&pool, rules, target_size, "genre", |t| {
        scoring::genre_overlap(t.genres(), &pool_genres).unwrap_or(0.0)
    })
}

/// Tempo strategy: ranks by proximity to a reference BPM on the 50-BPM
/// scale. Tracks without a tempo are dropped in the pre-filter; without a
/// reference BPM the builder returns nothing.
#[must_use]
pub fn build_tempo(
    catalog: &[Track],
    reference_bpm: Option<f64>,
    rules: &GenerationRules,
    target_size: usize,
) -> Vec<Track> {
    let Some(reference) = reference_bpm else {
        debug!("Tempo builder has no reference BPM, returning empty segment");
        return Vec::new();
    };

    let pool: Vec<&Track> = catalog
        .iter()
        .filter(|t| t.audio_features.as_ref().is_some_and(|f| f.tempo.is_some()))
        .collect();
    select_ranked(&pool, rules, target_size, "tempo", |t| {
        let tempo = t
            .audio_features
            .as_ref()
            .and_then(|f| f.tempo)
            .unwrap_or(reference);
        (1.0 - (tempo - reference).abs() / TEMPO_SCALE_BPM).max(0.0)
    })
}

/// Shared sort-then-walk pass: score the whole pool once (in parallel),
/// sort descending, then apply the eligibility constraints in order until
/// the target size is reached or the list is exhausted.
fn select_ranked<F>(
    pool: &[&Track],
    rules: &GenerationRules,
    target_size: usize,
    strategy: &str,
    score: F,
) -> Vec<Track>
where
    F: Fn(&Track) -> f64 + Sync,
{
    let mut ranked: Vec<(&Track, f64)> = pool
        .par_iter()
        .map(|t| (*t, score(t)))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let mut state = SelectionState::new();
    let mut selected = Vec::with_capacity(target_size.min(ranked.len()));
    for (track, value) in ranked {
        if selected.len() >= target_size {
            break;
        }
        if state.admits(track, rules) {
            trace!("{strategy} pick {} ({value:.3})", track.id);
            state.commit(track);
            selected.push(track.clone());
        }
    }

    if selected.len() < target_size {
        debug!(
            "{strategy} builder stopped at {}/{target_size} eligible tracks",
            selected.len()
        );
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArtistRef, FeatureDimension, PlayStats};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn track(id: &str, artist: &str, energy: f64) -> Track {
        Track {
            id: id.into(),
            title: id.into(),
            artist: ArtistRef {
                id: Some(artist.into()),
                name: artist.into(),
                genres: vec!["indie".into()],
            },
            audio_features: Some(AudioFeatures::from_pairs([(
                FeatureDimension::Energy,
                energy,
            )])),
            ..Track::default()
        }
    }

    fn catalog_of(count: usize, artists: usize) -> Vec<Track> {
        (0..count)
            .map(|i| track(&format!("t{i}"), &format!("a{}", i % artists), 0.5))
            .collect()
    }

    #[test]
    fn selection_state_enforces_uniqueness_and_artist_cap() {
        let rules = GenerationRules::default();
        let mut state = SelectionState::new();
        let first = track("t1", "a1", 0.5);
        let second = track("t2", "a1", 0.5);
        let third = track("t3", "a1", 0.5);

        assert!(state.admits(&first, &rules));
        state.commit(&first);
        assert!(!state.admits(&first, &rules), "same id must be rejected");
        assert!(state.admits(&second, &rules));
        state.commit(&second);
        assert!(!state.admits(&third, &rules), "artist cap of 2 must hold");
    }

    #[test]
    fn skip_filter_only_applies_when_enabled() {
        let mut skipped = track("t1", "a1", 0.5);
        skipped.stats.skip_ratio = 0.8;

        let state = SelectionState::new();
        assert!(state.admits(&skipped, &GenerationRules::default()));

        let rules = GenerationRules {
            avoid_skipped_tracks: true,
            ..GenerationRules::default()
        };
        assert!(!state.admits(&skipped, &rules));
    }

    #[test]
    fn similarity_respects_target_size_and_artist_cap() {
        let catalog = catalog_of(20, 10);
        let seeds: Vec<Track> = catalog.iter().take(5).cloned().collect();
        let rules = GenerationRules {
            min_similarity: 0.1,
            ..GenerationRules::default()
        };

        let result = build_similarity(&catalog, &UserProfile::empty(), &seeds, &rules, 10);
        assert_eq!(result.len(), 10);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for t in &result {
            *counts.entry(t.artist.id.as_deref().unwrap()).or_insert(0) += 1;
        }
        assert!(counts.values().all(|&c| c <= 2));

        let ids: HashSet<&str> = result.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), result.len(), "no track id may repeat");
    }

    #[test]
    fn similarity_terminates_short_when_threshold_blocks() {
        let catalog = catalog_of(20, 10);
        let seeds: Vec<Track> = catalog.iter().take(2).cloned().collect();
        // Scores blend a perfect feature match with full genre overlap, so
        // an impossible threshold excludes everything.
        let rules = GenerationRules {
            min_similarity: 1.5,
            ..GenerationRules::default()
        };

        let result = build_similarity(&catalog, &UserProfile::empty(), &seeds, &rules, 10);
        assert!(result.is_empty());
    }

    #[test]
    fn similarity_defaults_seeds_to_profile_top_tracks() {
        let catalog = catalog_of(10, 5);
        let profile = UserProfile {
            top_tracks: catalog.iter().take(3).cloned().collect(),
            ..UserProfile::empty()
        };
        let rules = GenerationRules {
            min_similarity: 0.1,
            ..GenerationRules::default()
        };

        let result = build_similarity(&catalog, &profile, &[], &rules, 5);
        assert!(!result.is_empty(), "profile top tracks must act as seeds");
    }

    #[test]
    fn mood_builder_filters_then_sorts_descending() {
        let target = AudioFeatures::from_pairs([(FeatureDimension::Energy, 0.8)]);
        let catalog = vec![
            track("close", "a1", 0.75),
            track("exact", "a2", 0.8),
            track("edge", "a3", 0.55),
            track("far", "a4", 0.2),
        ];

        let result = build_mood(&catalog, &target, &GenerationRules::default(), 10);
        let ids: Vec<&str> = result.iter().map(|t| t.id.as_str()).collect();
        // "far" is outside the 0.3 tolerance; the rest come back best-first.
        assert_eq!(ids, vec!["exact", "close", "edge"]);
    }

    #[test]
    fn discovery_builder_ranks_ideal_popularity_first() {
        let mut catalog = catalog_of(3, 3);
        catalog[0].popularity = Some(0.9);
        catalog[1].popularity = Some(0.4);
        catalog[2].popularity = Some(0.1);

        let result = build_discovery(
            &catalog,
            &UserProfile::empty(),
            &GenerationRules::default(),
            3,
            fixed_now(),
        );
        assert_eq!(result[0].id, "t1");
    }

    #[test]
    fn history_builder_prefers_recent_heavy_rotation() {
        let now = fixed_now();
        let mut catalog = catalog_of(2, 2);
        catalog[0].stats = PlayStats {
            play_count: 1,
            avg_completion_rate: 0.2,
            skip_ratio: 0.0,
            last_played_at: None,
        };
        catalog[1].stats = PlayStats {
            play_count: 30,
            avg_completion_rate: 0.95,
            skip_ratio: 0.0,
            last_played_at: Some(now - chrono::Duration::days(2)),
        };

        let result = build_history(&catalog, &GenerationRules::default(), 2, now);
        assert_eq!(result[0].id, "t1");
    }

    #[test]
    fn genre_builder_drops_tracks_without_overlap() {
        let mut catalog = catalog_of(3, 3);
        catalog[2].artist.genres = vec!["opera".into()];
        let profile = UserProfile::empty();

        let result = build_genre(
            &catalog,
            &profile,
            &["indie".to_string()],
            &GenerationRules::default(),
            10,
        );
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|t| t.genres().contains(&"indie".to_string())));
    }

    #[test]
    fn tempo_builder_needs_a_reference() {
        let mut catalog = catalog_of(3, 3);
        for (i, t) in catalog.iter_mut().enumerate() {
            t.audio_features.as_mut().unwrap().tempo = Some(100.0 + 20.0 * i as f64);
        }

        assert!(build_tempo(&catalog, None, &GenerationRules::default(), 5).is_empty());

        let result = build_tempo(&catalog, Some(118.0), &GenerationRules::default(), 5);
        assert_eq!(result[0].id, "t1", "120 BPM sits closest to 118");
    }
}
