//! Session event types.
//!
//! Events are delivered to the host on an unbounded channel; a slow
//! consumer can never stall the analysis timers.

use serde::{Deserialize, Serialize};

use rlens_analysis::{MeterReadings, Track};
use rlens_models::{AggregatedSignal, SessionSummary, TimelineEntry};

/// Message envelope pushed to the host per emotion tick and lifecycle edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// One classified emotion tick
    Tick {
        signal: AggregatedSignal,
        tracks: Vec<Track>,
        meters: MeterReadings,
    },

    /// The classified state changed; a new timeline segment opened
    SegmentStarted { entry: TimelineEntry },

    /// The session finished and the timeline is final
    Stopped { summary: SessionSummary },
}

impl SessionEvent {
    pub fn tick(signal: AggregatedSignal, tracks: Vec<Track>, meters: MeterReadings) -> Self {
        Self::Tick {
            signal,
            tracks,
            meters,
        }
    }

    pub fn segment_started(entry: TimelineEntry) -> Self {
        Self::SegmentStarted { entry }
    }

    pub fn stopped(summary: SessionSummary) -> Self {
        Self::Stopped { summary }
    }
}
