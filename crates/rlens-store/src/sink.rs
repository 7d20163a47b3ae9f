//! Telemetry sink interface and built-in sinks.
//!
//! A sink receives batches of signal records. The batch writer owns all
//! batching and retry behavior, so implementations only need to perform a
//! single append attempt and report failures honestly.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use rlens_models::SignalRecord;

use crate::error::{StoreError, StoreResult};

/// Destination for persisted signal records.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Get the name of this sink for logging and metric labels.
    fn name(&self) -> &'static str;

    /// Append a batch of records.
    ///
    /// Must be atomic per batch: either every record lands or the whole
    /// batch fails and will be offered again.
    async fn append(&self, records: &[SignalRecord]) -> StoreResult<()>;
}

// =============================================================================
// In-memory sink
// =============================================================================

/// Sink that collects records in memory.
///
/// Used in tests and as the default when persistence is disabled; can be
/// scripted to fail a fixed number of appends first.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<SignalRecord>>,
    fail_remaining: AtomicU32,
    appends: AtomicU64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose first `failures` appends fail as unavailable.
    pub fn failing(failures: u32) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_remaining: AtomicU32::new(failures),
            appends: AtomicU64::new(0),
        }
    }

    /// Snapshot of everything persisted so far.
    pub async fn records(&self) -> Vec<SignalRecord> {
        self.records.lock().await.clone()
    }

    /// Number of append attempts observed, including failed ones.
    pub fn append_attempts(&self) -> u64 {
        self.appends.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TelemetrySink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, records: &[SignalRecord]) -> StoreResult<()> {
        self.appends.fetch_add(1, Ordering::Relaxed);

        let remaining = self.fail_remaining.load(Ordering::Relaxed);
        if remaining > 0 {
            self.fail_remaining.store(remaining - 1, Ordering::Relaxed);
            return Err(StoreError::unavailable("scripted failure"));
        }

        self.records.lock().await.extend_from_slice(records);
        Ok(())
    }
}

// =============================================================================
// JSONL file sink
// =============================================================================

/// Sink that appends records as JSON lines to a local file.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TelemetrySink for JsonlSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn append(&self, records: &[SignalRecord]) -> StoreResult<()> {
        // Serialize the whole batch before touching the file so a bad
        // record cannot leave a partially written batch behind.
        let mut buf = String::new();
        for record in records {
            buf.push_str(&serde_json::to_string(record)?);
            buf.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;

        debug!(
            path = %self.path.display(),
            records = records.len(),
            "Appended telemetry batch"
        );
        Ok(())
    }
}
