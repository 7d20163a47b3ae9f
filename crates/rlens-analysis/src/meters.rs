//! Smoothed attention and engagement meters.
//!
//! Raw per-tick readings are too jumpy to display directly, so each meter
//! runs an exponential moving average toward the raw value. When the scene
//! empties there is no raw value at all and the meters decay toward zero by
//! a fixed step instead, which reads as a gradual fade rather than a snap.

use rlens_models::{AggregatedSignal, EmotionLabel};
use serde::{Deserialize, Serialize};

/// Smoothing and decay parameters for both meters.
#[derive(Debug, Clone, Copy)]
pub struct MeterConfig {
    /// EMA factor for the attention meter.
    pub attention_alpha: f64,
    /// EMA factor for the engagement meter.
    pub engagement_alpha: f64,
    /// Points subtracted per empty tick while no entities are active.
    pub decay_step: f64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            attention_alpha: 0.2,
            engagement_alpha: 0.15,
            decay_step: 4.0,
        }
    }
}

/// Snapshot of both meters after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReadings {
    pub attention: f64,
    pub engagement: f64,
}

/// Raw attention for one tick: presence plus emotion coverage.
///
/// Any tracked face contributes a base of 50; the remaining half scales
/// with how many of the active tracks actually carry scores yet.
pub fn attention_raw(signal: &AggregatedSignal) -> f64 {
    if signal.active_count == 0 {
        return 0.0;
    }
    let coverage = signal.scored_count as f64 / signal.active_count as f64;
    50.0 + 50.0 * coverage
}

/// Raw engagement for one tick: total non-neutral expression, capped at 100.
pub fn engagement_raw(signal: &AggregatedSignal) -> f64 {
    let expressive: f64 = signal
        .average_scores
        .iter()
        .filter(|(label, _)| *label != EmotionLabel::Neutral)
        .map(|(_, value)| value)
        .sum();
    expressive.min(100.0)
}

#[derive(Debug, Clone, Copy)]
struct Meter {
    alpha: f64,
    value: f64,
}

impl Meter {
    fn new(alpha: f64) -> Self {
        Self { alpha, value: 0.0 }
    }

    fn update(&mut self, raw: f64) -> f64 {
        // A non-finite sample would poison the running value for good.
        if raw.is_finite() {
            self.value += (raw - self.value) * self.alpha;
            self.value = self.value.clamp(0.0, 100.0);
        }
        self.value
    }

    fn decay(&mut self, step: f64) -> f64 {
        self.value = (self.value - step).clamp(0.0, 100.0);
        self.value
    }
}

/// Both display meters, advanced once per emotion tick.
#[derive(Debug, Clone)]
pub struct EngagementMeters {
    config: MeterConfig,
    attention: Meter,
    engagement: Meter,
}

impl EngagementMeters {
    pub fn new(config: MeterConfig) -> Self {
        Self {
            config,
            attention: Meter::new(config.attention_alpha),
            engagement: Meter::new(config.engagement_alpha),
        }
    }

    /// Advance both meters for one tick and return the smoothed readings.
    ///
    /// An empty scene decays instead of smoothing toward a raw value.
    pub fn observe(&mut self, signal: &AggregatedSignal) -> MeterReadings {
        if signal.active_count == 0 {
            return MeterReadings {
                attention: self.attention.decay(self.config.decay_step),
                engagement: self.engagement.decay(self.config.decay_step),
            };
        }
        MeterReadings {
            attention: self.attention.update(attention_raw(signal)),
            engagement: self.engagement.update(engagement_raw(signal)),
        }
    }

    pub fn readings(&self) -> MeterReadings {
        MeterReadings {
            attention: self.attention.value,
            engagement: self.engagement.value,
        }
    }
}

impl Default for EngagementMeters {
    fn default() -> Self {
        Self::new(MeterConfig::default())
    }
}
