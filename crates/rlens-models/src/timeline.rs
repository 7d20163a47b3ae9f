//! Session Timeline Schema and Export
//!
//! Structured output for a session's state segments, compatible with
//! downstream consumers (review UI, analytics, debugging).
//!
//! # Schema
//! ```json
//! {
//!   "version": "1.0",
//!   "session_id": "4f8a7c2e-...",
//!   "mode": "audience",
//!   "entries": [
//!     {
//!       "offset": "0:05",
//!       "offset_ms": 5100,
//!       "state": "High Engagement",
//!       "description": "The audience is strongly engaged and reacting positively.",
//!       "dominant_signals": [
//!         {"label": "happiness", "intensity": 70.0},
//!         {"label": "surprise", "intensity": 45.0}
//!       ],
//!       "face_count": 2
//!     }
//!   ],
//!   "duration_ms": 61000
//! }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::{SessionId, SessionMode, SignalStrength, StateLabel};

/// Schema version for compatibility checking.
pub const TIMELINE_VERSION: &str = "1.0";

/// One state segment, anchored at the tick where the state first appeared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEntry {
    /// Offset from session start, formatted M:SS
    pub offset: String,
    /// Offset from session start in milliseconds
    pub offset_ms: u64,
    /// Classified state
    pub state: StateLabel,
    /// Human description of the state
    pub description: String,
    /// Contributing signals above the reporting floor, strongest first
    pub dominant_signals: Vec<SignalStrength>,
    /// Tracked faces at the moment the segment opened
    pub face_count: usize,
}

/// Complete state timeline for one session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionTimeline {
    /// Schema version
    pub version: String,
    /// Session this timeline belongs to
    pub session_id: SessionId,
    /// Pipeline the session ran
    pub mode: SessionMode,
    /// Segments in emission order
    pub entries: Vec<TimelineEntry>,
    /// Total session duration in milliseconds, set at finalization
    pub duration_ms: u64,
}

impl SessionTimeline {
    /// Create a new empty timeline.
    pub fn new(session_id: SessionId, mode: SessionMode) -> Self {
        Self {
            version: TIMELINE_VERSION.to_string(),
            session_id,
            mode,
            entries: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Append a segment entry.
    pub fn push(&mut self, entry: TimelineEntry) {
        self.entries.push(entry);
    }

    /// Record the total session duration.
    pub fn finalize(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// States in emission order.
    pub fn states(&self) -> Vec<&StateLabel> {
        self.entries.iter().map(|e| &e.state).collect()
    }

    /// How long each segment lasted. The final segment runs to the end of
    /// the session, so this is only meaningful after [`finalize`].
    ///
    /// [`finalize`]: SessionTimeline::finalize
    pub fn segment_durations(&self) -> Vec<(&StateLabel, u64)> {
        let mut durations = Vec::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            let end_ms = match self.entries.get(i + 1) {
                Some(next) => next.offset_ms,
                None => self.duration_ms.max(entry.offset_ms),
            };
            durations.push((&entry.state, end_ms - entry.offset_ms));
        }
        durations
    }
}

/// Timeline exporter for various output formats.
pub struct TimelineExporter;

impl TimelineExporter {
    /// Export timeline to JSON.
    pub fn to_json(timeline: &SessionTimeline) -> serde_json::Result<String> {
        serde_json::to_string_pretty(timeline)
    }

    /// Export timeline to compact JSON (no whitespace).
    pub fn to_json_compact(timeline: &SessionTimeline) -> serde_json::Result<String> {
        serde_json::to_string(timeline)
    }

    /// Write timeline to file.
    pub fn write_to_file<P: AsRef<Path>>(
        timeline: &SessionTimeline,
        path: P,
    ) -> std::io::Result<()> {
        let json = Self::to_json(timeline)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        let mut file = std::fs::File::create(path.as_ref())?;
        file.write_all(json.as_bytes())?;

        info!("Wrote session timeline to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmotionLabel;

    fn entry(offset_ms: u64, state: &str) -> TimelineEntry {
        TimelineEntry {
            offset: crate::format_offset(offset_ms),
            offset_ms,
            state: StateLabel::from(state),
            description: format!("{} description", state),
            dominant_signals: vec![SignalStrength {
                label: EmotionLabel::Happiness,
                intensity: 50.0,
            }],
            face_count: 1,
        }
    }

    #[test]
    fn test_timeline_creation() {
        let timeline = SessionTimeline::new(SessionId::new(), SessionMode::Audience);
        assert_eq!(timeline.version, TIMELINE_VERSION);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_segment_durations() {
        let mut timeline = SessionTimeline::new(SessionId::new(), SessionMode::Audience);
        timeline.push(entry(0, "Neutral Attention"));
        timeline.push(entry(4_200, "High Engagement"));
        timeline.finalize(10_000);

        let durations: Vec<u64> = timeline
            .segment_durations()
            .into_iter()
            .map(|(_, d)| d)
            .collect();
        assert_eq!(durations, vec![4_200, 5_800]);
    }

    #[test]
    fn test_json_serialization() {
        let mut timeline = SessionTimeline::new(SessionId::new(), SessionMode::SingleViewer);
        timeline.push(entry(1_000, "Amusement"));

        let json = TimelineExporter::to_json(&timeline).unwrap();
        assert!(json.contains("\"version\":"));
        assert!(json.contains("\"dominant_signals\":"));
        assert!(json.contains("\"single_viewer\""));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.json");

        let mut timeline = SessionTimeline::new(SessionId::new(), SessionMode::Audience);
        timeline.push(entry(0, "Neutral Attention"));
        TimelineExporter::write_to_file(&timeline, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let back: SessionTimeline = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.entries.len(), 1);
    }
}
