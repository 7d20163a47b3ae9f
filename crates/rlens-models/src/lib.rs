//! Shared data models for the ReactLens analysis core.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion labels and score vectors
//! - Per-tick aggregated signals
//! - Timeline entries and session timelines
//! - Session summaries and intensity bands
//! - Persistence records

pub mod emotion;
pub mod record;
pub mod session;
pub mod signal;
pub mod state;
pub mod summary;
pub mod timeline;
pub mod timestamp;

// Re-export common types
pub use emotion::{EmotionLabel, EmotionScores, SignalStrength};
pub use record::SignalRecord;
pub use session::{SessionId, SessionMode};
pub use signal::AggregatedSignal;
pub use state::StateLabel;
pub use summary::{IntensityBand, SessionSummary};
pub use timeline::{SessionTimeline, TimelineEntry, TimelineExporter, TIMELINE_VERSION};
pub use timestamp::{format_offset, parse_offset, OffsetError};
