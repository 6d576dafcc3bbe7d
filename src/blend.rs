//! Hybrid blending: bucket split and round-robin interleave.
//!
//! The hybrid strategy partitions the target size across four strategies,
//! runs each single-strategy builder independently, and interleaves the
//! segments. Builders do not share selection state, so a track picked by
//! two strategies legitimately appears in more than one segment; the
//! blended list is handed to post-processing as-is, duplicates included,
//! and its length may differ from the target size.

use crate::model::Track;

/// Fixed strategy shares for the hybrid split, in interleave order.
pub const SIMILARITY_SHARE: f64 = 0.4;
pub const MOOD_SHARE: f64 = 0.2;
pub const DISCOVERY_SHARE: f64 = 0.2;
pub const HISTORY_SHARE: f64 = 0.2;

/// Split `target_size` into the four strategy buckets.
///
/// Each bucket is `floor(size × share)`; the rounding shortfall goes
/// entirely to the similarity bucket, so the buckets always sum to exactly
/// `target_size`. Order: similarity, mood, discovery, history.
#[must_use]
pub fn split_buckets(target_size: usize) -> [usize; 4] {
    let floor_of = |share: f64| (target_size as f64 * share).floor() as usize;

    let mut similarity = floor_of(SIMILARITY_SHARE);
    let mood = floor_of(MOOD_SHARE);
    let discovery = floor_of(DISCOVERY_SHARE);
    let history = floor_of(HISTORY_SHARE);

    similarity += target_size - (similarity + mood + discovery + history);
    [similarity, mood, discovery, history]
}

/// Round-robin interleave of strategy segments, in fixed strategy order.
///
/// Index 0 of every segment comes first, then index 1, and so on; segments
/// that run short simply stop contributing, and the later elements of the
/// longer segments close the gaps.
#[must_use]
pub fn interleave(segments: &[Vec<Track>]) -> Vec<Track> {
    let longest = segments.iter().map(Vec::len).max().unwrap_or(0);
    let mut blended = Vec::with_capacity(segments.iter().map(Vec::len).sum());

    for i in 0..longest {
        for segment in segments {
            if let Some(track) = segment.get(i) {
                blended.push(track.clone());
            }
        }
    }

    blended
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str) -> Track {
        Track {
            id: id.into(),
            ..Track::default()
        }
    }

    #[test]
    fn buckets_always_sum_to_target() {
        for target in 0..=100 {
            let buckets = split_buckets(target);
            assert_eq!(
                buckets.iter().sum::<usize>(),
                target,
                "buckets must sum exactly for target {target}"
            );
        }
    }

    #[test]
    fn rounding_shortfall_goes_to_similarity() {
        // 30: floors are 12/6/6/6, no shortfall.
        assert_eq!(split_buckets(30), [12, 6, 6, 6]);
        // 7: floors are 2/1/1/1, shortfall of 2 lands on similarity.
        assert_eq!(split_buckets(7), [4, 1, 1, 1]);
        assert_eq!(split_buckets(0), [0, 0, 0, 0]);
    }

    #[test]
    fn interleave_is_round_robin_in_segment_order() {
        let segments = vec![
            vec![named("s1"), named("s2")],
            vec![named("m1")],
            vec![named("d1"), named("d2"), named("d3")],
        ];

        let ids: Vec<String> = interleave(&segments).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["s1", "m1", "d1", "s2", "d2", "d3"]);
    }

    #[test]
    fn interleave_preserves_cross_segment_duplicates() {
        let segments = vec![vec![named("x")], vec![named("x")]];
        let blended = interleave(&segments);
        assert_eq!(blended.len(), 2, "duplicates across segments are kept");
    }

    #[test]
    fn interleave_of_nothing_is_empty() {
        assert!(interleave(&[]).is_empty());
        assert!(interleave(&[Vec::new(), Vec::new()]).is_empty());
    }
}
