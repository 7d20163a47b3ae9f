//! Data models for the tracking pipeline.

use rlens_models::EmotionScores;
use serde::{Deserialize, Serialize};

/// Stable identity assigned by the tracker. Monotonically allocated within
/// a session and never reused, even after the original face is gone.
pub type TrackId = u64;

/// Bounding box in frame-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge x-coordinate
    pub x: f64,
    /// Top edge y-coordinate
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center x-coordinate.
    #[inline]
    pub fn cx(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Center y-coordinate.
    #[inline]
    pub fn cy(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Euclidean distance between box centers.
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let dx = self.cx() - other.cx();
        let dy = self.cy() - other.cy();
        (dx * dx + dy * dy).sqrt()
    }

    /// Blend toward `incoming`, weighting the incoming box by `alpha`.
    /// Applied component-wise to x, y, width, and height.
    pub fn blend(&self, incoming: &BoundingBox, alpha: f64) -> BoundingBox {
        let keep = 1.0 - alpha;
        BoundingBox {
            x: keep * self.x + alpha * incoming.x,
            y: keep * self.y + alpha * incoming.y,
            width: keep * self.width + alpha * incoming.width,
            height: keep * self.height + alpha * incoming.height,
        }
    }

    /// Grow the box by `fraction` of its own size on every side.
    pub fn pad(&self, fraction: f64) -> BoundingBox {
        let pad_x = self.width * fraction;
        let pad_y = self.height * fraction;
        BoundingBox {
            x: self.x - pad_x,
            y: self.y - pad_y,
            width: self.width + 2.0 * pad_x,
            height: self.height + 2.0 * pad_y,
        }
    }

    /// Finite coordinates and strictly positive size.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// One perception-module output for a single frame.
///
/// Ephemeral; produced and consumed within one tracking cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Detected face box
    pub bbox: BoundingBox,
    /// Optional landmark points, opaque to the tracker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Vec<(f64, f64)>>,
    /// Milliseconds since session start when the frame was captured
    pub timestamp_ms: u64,
}

impl Detection {
    /// Create a new detection.
    pub fn new(bbox: BoundingBox, timestamp_ms: u64) -> Self {
        Self {
            bbox,
            landmarks: None,
            timestamp_ms,
        }
    }
}

/// A tracked identity.
///
/// Owned exclusively by one [`FaceTracker`]; the id is the join key the
/// emotion pipeline uses to attach scores asynchronously.
///
/// [`FaceTracker`]: crate::tracker::FaceTracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Stable identity, never reassigned to a different face
    pub id: TrackId,
    /// Exponentially smoothed box
    pub bbox: BoundingBox,
    /// Timestamp of the most recent matched detection
    pub last_seen_ms: u64,
    /// Latest emotion scores, `None` until the classifier has processed
    /// this track at least once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionScores>,
    /// When the emotion classifier last processed this track
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_emotion_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_distance() {
        let a = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(30.0, 40.0, 100.0, 100.0);
        assert!((a.center_distance(&b) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_weights_incoming() {
        let old = BoundingBox::new(100.0, 100.0, 50.0, 50.0);
        let new = BoundingBox::new(200.0, 100.0, 60.0, 50.0);
        let blended = old.blend(&new, 0.7);

        assert!((blended.x - 170.0).abs() < 1e-9);
        assert!((blended.width - 57.0).abs() < 1e-9);
        assert!((blended.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pad_keeps_center() {
        let bbox = BoundingBox::new(100.0, 100.0, 50.0, 40.0);
        let padded = bbox.pad(0.15);

        assert!((padded.cx() - bbox.cx()).abs() < 1e-9);
        assert!((padded.cy() - bbox.cy()).abs() < 1e-9);
        assert!((padded.width - 65.0).abs() < 1e-9);
        assert!((padded.height - 52.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid_rejects_degenerate_boxes() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, -5.0, 10.0).is_valid());
        assert!(!BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0).is_valid());
        assert!(!BoundingBox::new(0.0, f64::INFINITY, 10.0, 10.0).is_valid());
    }
}
