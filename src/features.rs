//! Audio-feature comparison primitives.
//!
//! Everything here is a small pure function over partial feature vectors.
//! The comparator only ever averages dimensions present in *both* inputs;
//! a missing dimension is skipped, never treated as zero.

use crate::model::{AudioFeatures, Track, MEAN_DIMENSIONS};

/// Tempo differences are scaled against this BPM window: a 50-BPM gap (or
/// more) counts as zero proximity.
pub const TEMPO_SCALE_BPM: f64 = 50.0;

/// Pairwise similarity in [0,1] over the dimensions present in both vectors.
///
/// Each shared dimension contributes `1 - |a - b|`; the result is the
/// arithmetic mean over shared dimensions. Returns `None` when the vectors
/// share no dimension, so callers can distinguish "no evidence" from
/// "genuinely dissimilar".
#[must_use]
pub fn shared_similarity(a: &AudioFeatures, b: &AudioFeatures) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;

    for &dim in &MEAN_DIMENSIONS {
        if let (Some(x), Some(y)) = (a.get(dim), b.get(dim)) {
            sum += 1.0 - (x - y).abs();
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Pairwise similarity in [0,1]; 0 when no dimension overlaps.
#[must_use]
pub fn feature_similarity(a: &AudioFeatures, b: &AudioFeatures) -> f64 {
    let score = shared_similarity(a, b).unwrap_or(0.0);
    log::trace!("Feature similarity {score:.3}");
    score
}

/// Tempo proximity on the 50-BPM scale, when both vectors carry a tempo.
#[must_use]
pub fn tempo_proximity(a: &AudioFeatures, b: &AudioFeatures) -> Option<f64> {
    match (a.tempo, b.tempo) {
        (Some(ta), Some(tb)) => Some((1.0 - (ta - tb).abs() / TEMPO_SCALE_BPM).max(0.0)),
        _ => None,
    }
}

/// Per-dimension mean over the tracks that define each dimension.
///
/// Tracks with no audio features at all are excluded entirely; a track that
/// has *some* features still only contributes to the dimensions it defines.
/// Tempo is averaged the same way so seed sets can anchor tempo-based
/// strategies. Returns `None` when no track has any audio features.
#[must_use]
pub fn average_features(tracks: &[Track]) -> Option<AudioFeatures> {
    let vectors: Vec<&AudioFeatures> = tracks
        .iter()
        .filter_map(|t| t.audio_features.as_ref())
        .filter(|f| !f.is_empty())
        .collect();

    if vectors.is_empty() {
        return None;
    }

    let mut pairs = Vec::new();
    for &dim in &MEAN_DIMENSIONS {
        let values: Vec<f64> = vectors.iter().filter_map(|f| f.get(dim)).collect();
        if !values.is_empty() {
            pairs.push((dim, values.iter().sum::<f64>() / values.len() as f64));
        }
    }
    let mut avg = AudioFeatures::from_pairs(pairs);

    let tempos: Vec<f64> = vectors.iter().filter_map(|f| f.tempo).collect();
    if !tempos.is_empty() {
        avg.tempo = Some(tempos.iter().sum::<f64>() / tempos.len() as f64);
    }

    Some(avg)
}
