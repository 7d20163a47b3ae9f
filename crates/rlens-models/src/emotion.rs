//! Emotion labels and score vectors.
//!
//! A [`EmotionScores`] value always carries every label: absent dimensions
//! are zero-filled rather than omitted, so downstream consumers never have
//! to distinguish "missing" from "zero".

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of emotion dimensions produced by the perception module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Happiness,
    Sadness,
    Anger,
    Fear,
    Disgust,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    /// All labels in canonical order. Tie-breaks elsewhere follow this order.
    pub const ALL: [EmotionLabel; 7] = [
        EmotionLabel::Happiness,
        EmotionLabel::Sadness,
        EmotionLabel::Anger,
        EmotionLabel::Fear,
        EmotionLabel::Disgust,
        EmotionLabel::Surprise,
        EmotionLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happiness => "happiness",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intensities in `[0, 100]` for every emotion dimension.
///
/// Raw classifier output may contain out-of-range or non-finite values;
/// pass it through [`EmotionScores::sanitized`] at the ingestion boundary.
/// Everything downstream assumes clamped, finite entries.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmotionScores {
    pub happiness: f64,
    pub sadness: f64,
    pub anger: f64,
    pub fear: f64,
    pub disgust: f64,
    pub surprise: f64,
    pub neutral: f64,
}

impl EmotionScores {
    /// All dimensions at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, label: EmotionLabel) -> f64 {
        match label {
            EmotionLabel::Happiness => self.happiness,
            EmotionLabel::Sadness => self.sadness,
            EmotionLabel::Anger => self.anger,
            EmotionLabel::Fear => self.fear,
            EmotionLabel::Disgust => self.disgust,
            EmotionLabel::Surprise => self.surprise,
            EmotionLabel::Neutral => self.neutral,
        }
    }

    /// Set one dimension, clamping to `[0, 100]` and mapping non-finite
    /// input to zero.
    pub fn set(&mut self, label: EmotionLabel, value: f64) {
        let value = if value.is_finite() {
            value.clamp(0.0, 100.0)
        } else {
            0.0
        };
        match label {
            EmotionLabel::Happiness => self.happiness = value,
            EmotionLabel::Sadness => self.sadness = value,
            EmotionLabel::Anger => self.anger = value,
            EmotionLabel::Fear => self.fear = value,
            EmotionLabel::Disgust => self.disgust = value,
            EmotionLabel::Surprise => self.surprise = value,
            EmotionLabel::Neutral => self.neutral = value,
        }
    }

    /// Re-apply the range invariant to every dimension.
    pub fn sanitized(mut self) -> Self {
        for label in EmotionLabel::ALL {
            let value = self.get(label);
            self.set(label, value);
        }
        self
    }

    /// Iterate `(label, intensity)` pairs in canonical label order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f64)> + '_ {
        EmotionLabel::ALL.iter().map(move |&label| (label, self.get(label)))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, v)| v <= 0.0)
    }

    /// The strictly highest dimension, or `None` when every dimension is
    /// zero. Ties resolve to the label declared first.
    pub fn dominant(&self) -> Option<(EmotionLabel, f64)> {
        let mut best: Option<(EmotionLabel, f64)> = None;
        for (label, value) in self.iter() {
            if value > 0.0 && best.map_or(true, |(_, b)| value > b) {
                best = Some((label, value));
            }
        }
        best
    }

    /// Dimensions strictly above `floor`, sorted by descending intensity.
    /// Equal intensities keep canonical label order.
    pub fn top_signals(&self, floor: f64) -> Vec<SignalStrength> {
        let mut signals: Vec<SignalStrength> = self
            .iter()
            .filter(|(_, v)| *v > floor)
            .map(|(label, intensity)| SignalStrength { label, intensity })
            .collect();
        signals.sort_by(|a, b| {
            b.intensity
                .partial_cmp(&a.intensity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        signals
    }
}

/// One labeled intensity, as surfaced in timeline entries and summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalStrength {
    pub label: EmotionLabel,
    pub intensity: f64,
}
