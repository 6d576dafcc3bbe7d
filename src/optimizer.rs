//! Track-to-track sequence optimization.
//!
//! A greedy nearest-neighbor pass: keep the first track, then repeatedly
//! append whichever remaining track transitions best from the one just
//! placed. No backtracking and no global optimality guarantee; the point is
//! cheap local smoothness in O(n²) over the segment length.

use crate::features::{shared_similarity, tempo_proximity};
use crate::model::Track;
use log::trace;

/// Flat factor contributed when two adjacent tracks share an artist.
pub const SAME_ARTIST_BONUS: f64 = 0.3;

/// Neutral transition score for pairs with no comparable data, so
/// all-missing-data pairs never block the optimizer.
pub const NEUTRAL_TRANSITION: f64 = 0.5;

/// Sequences shorter than this pass through unchanged.
const MIN_OPTIMIZE_LEN: usize = 3;

/// Transition score between two adjacent tracks.
///
/// Mean over the applicable factors: feature similarity of the two full
/// vectors, a flat [`SAME_ARTIST_BONUS`] when the artist repeats, and tempo
/// proximity on the 50-BPM scale. Defaults to [`NEUTRAL_TRANSITION`] when
/// no factor applies.
#[must_use]
pub fn transition_score(a: &Track, b: &Track) -> f64 {
    let mut factors = Vec::with_capacity(3);

    if let (Some(fa), Some(fb)) = (&a.audio_features, &b.audio_features) {
        if let Some(similarity) = shared_similarity(fa, fb) {
            factors.push(similarity);
        }
        if let Some(proximity) = tempo_proximity(fa, fb) {
            factors.push(proximity);
        }
    }

    if let (Some(ia), Some(ib)) = (&a.artist.id, &b.artist.id) {
        if ia == ib {
            factors.push(SAME_ARTIST_BONUS);
        }
    }

    if factors.is_empty() {
        NEUTRAL_TRANSITION
    } else {
        factors.iter().sum::<f64>() / factors.len() as f64
    }
}

/// Reorder a track list to improve adjacent transitions.
///
/// Greedy nearest-neighbor tour construction starting from the first track.
/// Lists of two or fewer tracks come back untouched.
#[must_use]
pub fn optimize_sequence(tracks: Vec<Track>) -> Vec<Track> {
    if tracks.len() < MIN_OPTIMIZE_LEN {
        return tracks;
    }

    let mut pool = tracks;
    let mut ordered = Vec::with_capacity(pool.len());
    ordered.push(pool.remove(0));

    while !pool.is_empty() {
        let last = ordered.last().expect("ordered starts non-empty");
        let (best_idx, best_score) = pool
            .iter()
            .enumerate()
            .map(|(i, candidate)| (i, transition_score(last, candidate)))
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .expect("pool is non-empty");

        trace!(
            "Transition {} -> {} scored {best_score:.3}",
            last.id,
            pool[best_idx].id
        );
        ordered.push(pool.remove(best_idx));
    }

    ordered
}
