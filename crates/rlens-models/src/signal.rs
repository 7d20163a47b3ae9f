//! Per-tick aggregated signals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{EmotionLabel, EmotionScores};

/// One sampling tick's audience-level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AggregatedSignal {
    /// Milliseconds since session start
    pub timestamp_ms: u64,

    /// Arithmetic mean over all tracks with emotion data; exact zeros when
    /// no track has been scored yet
    pub average_scores: EmotionScores,

    /// Number of spatially tracked identities, scored or not
    pub active_count: usize,

    /// How many of those identities contributed emotion data to the mean
    pub scored_count: usize,
}

impl AggregatedSignal {
    /// Signal for a tick with nothing in frame.
    pub fn empty(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            average_scores: EmotionScores::zero(),
            active_count: 0,
            scored_count: 0,
        }
    }

    /// The strictly highest averaged dimension, or `None` when everything
    /// is zero. "No dominant signal" is distinct from "neutral dominates".
    pub fn dominant(&self) -> Option<(EmotionLabel, f64)> {
        self.average_scores.dominant()
    }
}
