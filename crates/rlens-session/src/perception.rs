//! Perception collaborator interfaces.
//!
//! The engine never talks to a camera or a model runtime directly. Hosts
//! inject an implementation of [`FacePerception`]; the engine owns timing,
//! tracking, and state, and survives any single failed inference call.

use async_trait::async_trait;
use thiserror::Error;

use rlens_analysis::{BoundingBox, Detection, TrackId};
use rlens_models::EmotionScores;

pub type PerceptionResult<T> = Result<T, PerceptionError>;

/// Errors surfaced by a perception implementation.
///
/// The engine treats every variant the same way at steady state: log, skip
/// this tick, keep last-known data. Model-load problems belong to host
/// startup, before a session exists.
#[derive(Debug, Error)]
pub enum PerceptionError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),
}

impl PerceptionError {
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}

/// Crop request handed to the emotion classifier.
///
/// The box is already padded by the engine's `crop_padding`, so
/// implementations can crop it as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    /// Track the scores will be joined back to
    pub track_id: TrackId,
    /// Padded crop box in frame pixels
    pub bbox: BoundingBox,
}

/// Face detector plus emotion classifier, as one injected collaborator.
#[async_trait]
pub trait FacePerception: Send + Sync {
    /// Get the name of this perception backend for logging.
    fn name(&self) -> &'static str;

    /// Detect faces in the current frame.
    async fn detect_faces(&self) -> PerceptionResult<Vec<Detection>>;

    /// Score emotions for one face crop.
    async fn classify_emotion(&self, region: &FaceRegion) -> PerceptionResult<EmotionScores>;
}
