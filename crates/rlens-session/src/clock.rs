//! Session-relative monotonic clock.

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Monotonic milliseconds since session start.
///
/// Every pipeline timestamp comes from here, which is what lets the
/// tracker and segmenter assume non-decreasing time. Wall-clock time is
/// captured once at start for persisted records and reports.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
    started_at: DateTime<Utc>,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Milliseconds elapsed since the session started.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Wall-clock time the session started.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_clock_follows_runtime_time() {
        let clock = SessionClock::start();
        assert_eq!(clock.now_ms(), 0);

        tokio::time::advance(std::time::Duration::from_millis(1234)).await;
        assert_eq!(clock.now_ms(), 1234);
    }
}
