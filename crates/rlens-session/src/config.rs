//! Session configuration.

use std::time::Duration;

use rlens_analysis::{MeterConfig, TrackerConfig};
use rlens_models::SessionMode;
use rlens_store::WriterConfig;

use crate::error::{SessionError, SessionResult};

/// Session engine configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Rule catalog and cadence profile
    pub mode: SessionMode,
    /// Detection timer period
    pub detect_interval: Duration,
    /// Emotion timer period
    pub emotion_interval: Duration,
    /// Faces classified per emotion tick, oldest-processed first
    pub max_faces_per_emotion_tick: usize,
    /// Fractional padding applied to track boxes before classification crops
    pub crop_padding: f64,
    /// Tracker tuning
    pub tracker: TrackerConfig,
    /// Meter smoothing tuning
    pub meters: MeterConfig,
    /// Telemetry batching tuning
    pub writer: WriterConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::Audience,
            detect_interval: Duration::from_millis(150),
            emotion_interval: Duration::from_millis(300),
            max_faces_per_emotion_tick: 4,
            crop_padding: 0.15,
            tracker: TrackerConfig::default(),
            meters: MeterConfig::default(),
            writer: WriterConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Profile for a session mode.
    ///
    /// Single-viewer sessions classify one face per tick; audience sessions
    /// spread the emotion budget across up to four faces.
    pub fn for_mode(mode: SessionMode) -> Self {
        let max_faces_per_emotion_tick = match mode {
            SessionMode::Audience => 4,
            SessionMode::SingleViewer => 1,
        };
        Self {
            mode,
            max_faces_per_emotion_tick,
            ..Self::default()
        }
    }

    /// Create config from environment variables.
    pub fn from_env(mode: SessionMode) -> Self {
        let base = Self::for_mode(mode);
        Self {
            detect_interval: Duration::from_millis(
                std::env::var("RLENS_DETECT_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(150),
            ),
            emotion_interval: Duration::from_millis(
                std::env::var("RLENS_EMOTION_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            max_faces_per_emotion_tick: std::env::var("RLENS_MAX_EMOTION_FACES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(base.max_faces_per_emotion_tick),
            crop_padding: std::env::var("RLENS_CROP_PADDING")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.15),
            ..base
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> SessionResult<()> {
        if self.detect_interval.is_zero() || self.emotion_interval.is_zero() {
            return Err(SessionError::config_error("timer intervals must be non-zero"));
        }
        if self.max_faces_per_emotion_tick == 0 {
            return Err(SessionError::config_error(
                "max_faces_per_emotion_tick must be at least 1",
            ));
        }
        if !self.crop_padding.is_finite() || self.crop_padding < 0.0 {
            return Err(SessionError::config_error(
                "crop_padding must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_mode_profiles() {
        assert_eq!(
            SessionConfig::for_mode(SessionMode::Audience).max_faces_per_emotion_tick,
            4
        );
        assert_eq!(
            SessionConfig::for_mode(SessionMode::SingleViewer).max_faces_per_emotion_tick,
            1
        );
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = SessionConfig {
            detect_interval: Duration::ZERO,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_emotion_budget() {
        let config = SessionConfig {
            max_faces_per_emotion_tick: 0,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_padding() {
        let config = SessionConfig {
            crop_padding: -0.1,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
