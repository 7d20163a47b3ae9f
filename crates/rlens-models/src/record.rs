//! Per-tick persistence records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{EmotionScores, SessionId, StateLabel};

/// One raw classification tick, as appended to the telemetry store.
///
/// Minimal round-trip shape; how a store lays these out is the sink's
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalRecord {
    /// Owning session
    pub session_id: SessionId,

    /// Tick sequence number within the session, starting at 0
    pub seq: u64,

    /// Milliseconds since session start
    pub offset_ms: u64,

    /// Wall-clock time the tick was recorded
    pub recorded_at: DateTime<Utc>,

    /// Averaged scores at this tick
    pub scores: EmotionScores,

    /// Tracked faces at this tick
    pub active_count: usize,

    /// State the classifier assigned
    pub state: StateLabel,
}
