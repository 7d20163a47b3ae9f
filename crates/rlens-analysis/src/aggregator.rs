//! Per-tick signal aggregation.

use crate::models::Track;
use rlens_models::{AggregatedSignal, EmotionLabel, EmotionScores};

/// Combine the emotion scores of all tracked identities into one summary.
///
/// The mean runs over tracks whose emotion data is defined. When no track
/// has been scored yet every label is explicitly zero rather than omitted
/// or NaN, while `active_count` still reflects the full track set.
pub fn aggregate(tracks: &[Track], timestamp_ms: u64) -> AggregatedSignal {
    let scored: Vec<&EmotionScores> = tracks.iter().filter_map(|t| t.emotion.as_ref()).collect();

    let mut average_scores = EmotionScores::zero();
    if !scored.is_empty() {
        let n = scored.len() as f64;
        for label in EmotionLabel::ALL {
            let sum: f64 = scored.iter().map(|s| s.get(label)).sum();
            average_scores.set(label, sum / n);
        }
    }

    AggregatedSignal {
        timestamp_ms,
        average_scores,
        active_count: tracks.len(),
        scored_count: scored.len(),
    }
}
