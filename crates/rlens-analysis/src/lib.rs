#![deny(unreachable_patterns)]
//! Real-time face tracking and reaction classification.
//!
//! This crate implements the analysis core shared by the audience and
//! single-viewer pipelines:
//! 1. Identity tracking over noisy per-frame detections
//! 2. Per-tick aggregation of emotion scores across tracked faces
//! 3. Rule-based classification into discrete reaction states
//! 4. Run-length segmentation of the state stream into a timeline
//! 5. Smoothed attention/engagement meters
//!
//! # Architecture
//!
//! ```text
//! Perception (detector + classifier)
//!     │
//!     ▼
//! ┌─────────────────┐
//! │   FaceTracker   │ ← Stable identities across frames
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    aggregate    │ ← Mean scores + active count per tick
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ StateClassifier │ ← Prioritized rule catalog
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │TimelineSegmenter│ ← Collapse state runs into segments
//! └────────┬────────┘
//!          │
//!          ▼
//! Timeline + summary + meters
//! ```

pub mod aggregator;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod meters;
pub mod models;
pub mod narrative;
pub mod rules;
pub mod segmenter;
pub mod tracker;

pub use aggregator::aggregate;
pub use catalog::{rules_for_mode, AUDIENCE_RULES, RULES_VERSION, VIEWER_RULES};
pub use classifier::{Classification, MatchedRule, RuleTier, StateClassifier};
pub use error::{AnalysisError, AnalysisResult};
pub use meters::{attention_raw, engagement_raw, EngagementMeters, MeterConfig, MeterReadings};
pub use models::{BoundingBox, Detection, Track, TrackId};
pub use narrative::{narrative_for, SessionDigest};
pub use rules::{ForbiddenBand, RuleTable, ScoreBand, SizeRange, StateRule};
pub use segmenter::TimelineSegmenter;
pub use tracker::{FaceTracker, TrackerConfig};
