//! End-of-session summaries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::SignalStrength;

/// Qualitative band for a 0-100 intensity.
///
/// Intensities below [`IntensityBand::FLOOR`] carry no band; they are
/// treated as noise rather than a reportable reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    /// [5, 35)
    Mild,
    /// [35, 60)
    Moderate,
    /// [60, 85)
    Strong,
    /// [85, 100]
    Intense,
}

impl IntensityBand {
    /// Intensities below this never band.
    pub const FLOOR: f64 = 5.0;

    /// Band for an intensity, `None` below the floor.
    pub fn from_intensity(intensity: f64) -> Option<Self> {
        if !intensity.is_finite() || intensity < Self::FLOOR {
            None
        } else if intensity < 35.0 {
            Some(IntensityBand::Mild)
        } else if intensity < 60.0 {
            Some(IntensityBand::Moderate)
        } else if intensity < 85.0 {
            Some(IntensityBand::Strong)
        } else {
            Some(IntensityBand::Intense)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityBand::Mild => "mild",
            IntensityBand::Moderate => "moderate",
            IntensityBand::Strong => "strong",
            IntensityBand::Intense => "intense",
        }
    }
}

impl fmt::Display for IntensityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall session verdict delivered with the finalized timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionSummary {
    /// Highest-peaking signal across the whole session, if any signal ever
    /// cleared the reporting floor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant: Option<SignalStrength>,

    /// Band of the dominant peak
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<IntensityBand>,

    /// Narrative text for the dominant pattern
    pub narrative: String,

    /// Number of timeline segments
    pub segment_count: usize,

    /// Number of classification ticks observed
    pub tick_count: u64,

    /// Session duration in milliseconds
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(IntensityBand::from_intensity(0.0), None);
        assert_eq!(IntensityBand::from_intensity(4.9), None);
        assert_eq!(IntensityBand::from_intensity(5.0), Some(IntensityBand::Mild));
        assert_eq!(IntensityBand::from_intensity(34.9), Some(IntensityBand::Mild));
        assert_eq!(IntensityBand::from_intensity(35.0), Some(IntensityBand::Moderate));
        assert_eq!(IntensityBand::from_intensity(59.9), Some(IntensityBand::Moderate));
        assert_eq!(IntensityBand::from_intensity(60.0), Some(IntensityBand::Strong));
        assert_eq!(IntensityBand::from_intensity(84.9), Some(IntensityBand::Strong));
        assert_eq!(IntensityBand::from_intensity(85.0), Some(IntensityBand::Intense));
        assert_eq!(IntensityBand::from_intensity(100.0), Some(IntensityBand::Intense));
    }

    #[test]
    fn test_band_rejects_non_finite() {
        assert_eq!(IntensityBand::from_intensity(f64::NAN), None);
    }
}
