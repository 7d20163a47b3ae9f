//! Run-length segmentation of the classified state stream.

use crate::classifier::Classification;
use rlens_models::{
    format_offset, AggregatedSignal, SessionId, SessionMode, SessionTimeline, StateLabel,
    TimelineEntry,
};
use tracing::debug;

/// Reporting floor for dominant signals carried on timeline entries.
/// Intensities at or below this are noise and are left off the entry.
pub const DEFAULT_SIGNAL_FLOOR: f64 = 5.0;

/// Collapses consecutive identical states into timeline segments.
///
/// Callers must observe ticks in increasing timestamp order; that contract
/// is owned by the session scheduling, not re-checked here.
#[derive(Debug)]
pub struct TimelineSegmenter {
    signal_floor: f64,
    /// State of the most recently emitted entry. `None` only before the
    /// first observation, so the first state always emits.
    last_state: Option<StateLabel>,
    timeline: SessionTimeline,
}

impl TimelineSegmenter {
    /// Create a segmenter with the default reporting floor.
    pub fn new(session_id: SessionId, mode: SessionMode) -> Self {
        Self::with_floor(session_id, mode, DEFAULT_SIGNAL_FLOOR)
    }

    /// Create a segmenter with a custom reporting floor.
    pub fn with_floor(session_id: SessionId, mode: SessionMode, signal_floor: f64) -> Self {
        Self {
            signal_floor,
            last_state: None,
            timeline: SessionTimeline::new(session_id, mode),
        }
    }

    /// Observe one classified tick.
    ///
    /// Returns the new entry when the state differs from the previous
    /// emission, `None` while the current segment continues.
    pub fn observe(
        &mut self,
        timestamp_ms: u64,
        classification: &Classification,
        signal: &AggregatedSignal,
    ) -> Option<TimelineEntry> {
        if self.last_state.as_ref() == Some(&classification.state) {
            return None;
        }

        let entry = TimelineEntry {
            offset: format_offset(timestamp_ms),
            offset_ms: timestamp_ms,
            state: classification.state.clone(),
            description: classification.description.clone(),
            dominant_signals: signal.average_scores.top_signals(self.signal_floor),
            face_count: signal.active_count,
        };

        debug!(
            offset = %entry.offset,
            state = %entry.state,
            face_count = entry.face_count,
            "Timeline segment opened"
        );

        self.last_state = Some(classification.state.clone());
        self.timeline.push(entry.clone());
        Some(entry)
    }

    /// Entries emitted so far.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.timeline.entries
    }

    /// State of the currently open segment.
    pub fn current_state(&self) -> Option<&StateLabel> {
        self.last_state.as_ref()
    }

    /// Finalize into a read-only timeline.
    pub fn into_timeline(mut self, duration_ms: u64) -> SessionTimeline {
        self.timeline.finalize(duration_ms);
        self.timeline
    }
}
