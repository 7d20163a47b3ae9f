//! Batched persistence of signal records.
//!
//! Records are fed through an unbounded channel so the analysis loop never
//! blocks on storage. A background task drains the channel and appends to
//! the sink on a fixed cadence, one batch per flush. Failed batches stay
//! queued under doubling backoff; storage trouble is logged and counted,
//! never surfaced to the caller.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use rlens_models::SignalRecord;

use crate::metrics::{record_append, record_dropped, record_retry};
use crate::retry::{with_retry, RetryConfig};
use crate::sink::TelemetrySink;

// =============================================================================
// Configuration
// =============================================================================

/// Batch writer configuration.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Minimum spacing between append attempts (in milliseconds).
    pub flush_interval_ms: u64,
    /// Maximum records per append.
    pub max_batch: usize,
    /// Backoff cap once appends start failing (in milliseconds).
    pub max_backoff_ms: u64,
    /// Retry policy for the final flush on close.
    pub retry: RetryConfig,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            flush_interval_ms: 500,
            max_batch: 64,
            max_backoff_ms: 30_000,
            retry: RetryConfig::default(),
        }
    }
}

/// Lifetime counters for one writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterStats {
    /// Records accepted from the caller.
    pub enqueued: u64,
    /// Records confirmed by the sink.
    pub persisted: u64,
    /// Records lost after retries were exhausted or the batch was rejected.
    pub dropped: u64,
    /// Successful appends.
    pub flushes: u64,
    /// Failed append attempts that stayed queued for retry.
    pub retries: u64,
}

// =============================================================================
// Batch Writer
// =============================================================================

/// Background writer that batches records toward a [`TelemetrySink`].
pub struct BatchWriter {
    tx: mpsc::UnboundedSender<SignalRecord>,
    handle: JoinHandle<WriterStats>,
}

/// Cloneable enqueue handle for producer tasks.
///
/// [`BatchWriter::close`] only completes once every feed has been dropped,
/// so feeds must not outlive the producers they were handed to.
#[derive(Clone)]
pub struct WriterFeed {
    tx: mpsc::UnboundedSender<SignalRecord>,
}

impl WriterFeed {
    /// Queue one record. Never blocks.
    pub fn enqueue(&self, record: SignalRecord) {
        if self.tx.send(record).is_err() {
            warn!("Telemetry writer is closed, dropping record");
        }
    }
}

impl BatchWriter {
    /// Spawn the writer task.
    pub fn spawn(sink: Arc<dyn TelemetrySink>, config: WriterConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(Self::run(rx, sink, config));
        Self { tx, handle }
    }

    /// Queue one record. Never blocks.
    ///
    /// Records offered after shutdown are dropped with a warning.
    pub fn enqueue(&self, record: SignalRecord) {
        if self.tx.send(record).is_err() {
            warn!("Telemetry writer is closed, dropping record");
        }
    }

    /// Hand out a cloneable enqueue handle.
    pub fn feed(&self) -> WriterFeed {
        WriterFeed {
            tx: self.tx.clone(),
        }
    }

    /// Stop accepting records, flush everything queued, and return counters.
    pub async fn close(self) -> WriterStats {
        let Self { tx, handle } = self;
        drop(tx);

        match handle.await {
            Ok(stats) => {
                info!(
                    persisted = stats.persisted,
                    dropped = stats.dropped,
                    "Telemetry writer closed"
                );
                stats
            }
            Err(e) => {
                error!("Telemetry writer task failed: {}", e);
                WriterStats::default()
            }
        }
    }

    async fn run(
        mut rx: mpsc::UnboundedReceiver<SignalRecord>,
        sink: Arc<dyn TelemetrySink>,
        config: WriterConfig,
    ) -> WriterStats {
        let mut stats = WriterStats::default();
        let mut pending: VecDeque<SignalRecord> = VecDeque::new();
        let mut backoff_ms: u64 = 0;
        let mut next_attempt = Instant::now();

        let mut interval = tokio::time::interval(Duration::from_millis(config.flush_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(record) => {
                        stats.enqueued += 1;
                        pending.push_back(record);
                    }
                    // All senders dropped and the channel is drained.
                    None => break,
                },
                _ = interval.tick() => {
                    if pending.is_empty() || Instant::now() < next_attempt {
                        continue;
                    }

                    let len = pending.len().min(config.max_batch);
                    let batch: Vec<SignalRecord> = pending.iter().take(len).cloned().collect();
                    let started = Instant::now();

                    match sink.append(&batch).await {
                        Ok(()) => {
                            pending.drain(..len);
                            stats.persisted += len as u64;
                            stats.flushes += 1;
                            backoff_ms = 0;
                            record_append(
                                sink.name(),
                                "ok",
                                len,
                                started.elapsed().as_secs_f64() * 1000.0,
                            );
                            debug!(records = len, queued = pending.len(), "Flushed telemetry batch");
                        }
                        Err(e) if e.is_retryable() => {
                            backoff_ms = match backoff_ms {
                                0 => config.flush_interval_ms,
                                ms => ms.saturating_mul(2).min(config.max_backoff_ms),
                            };
                            let wait = e
                                .retry_after_ms()
                                .unwrap_or(backoff_ms)
                                .min(config.max_backoff_ms);
                            next_attempt = Instant::now() + Duration::from_millis(wait);

                            stats.retries += 1;
                            record_retry(sink.name());
                            record_append(
                                sink.name(),
                                "error",
                                len,
                                started.elapsed().as_secs_f64() * 1000.0,
                            );
                            warn!(
                                queued = pending.len(),
                                backoff_ms = wait,
                                "Telemetry append failed, batch stays queued: {}",
                                e
                            );
                        }
                        Err(e) => {
                            // Rejected outright: these records will never land.
                            pending.drain(..len);
                            stats.dropped += len as u64;
                            record_dropped(sink.name(), len);
                            error!(records = len, "Telemetry batch rejected, dropping: {}", e);
                        }
                    }
                }
            }
        }

        Self::final_flush(&sink, &config, &mut pending, &mut stats).await;
        stats
    }

    /// Flush everything still queued at shutdown, retrying transient errors.
    async fn final_flush(
        sink: &Arc<dyn TelemetrySink>,
        config: &WriterConfig,
        pending: &mut VecDeque<SignalRecord>,
        stats: &mut WriterStats,
    ) {
        if pending.is_empty() {
            return;
        }
        info!(records = pending.len(), "Final telemetry flush");

        while !pending.is_empty() {
            let len = pending.len().min(config.max_batch);
            let batch: Vec<SignalRecord> = pending.iter().take(len).cloned().collect();
            let started = Instant::now();

            let result = with_retry(&config.retry, sink.name(), || {
                let batch = batch.clone();
                let sink = Arc::clone(sink);
                async move { sink.append(&batch).await }
            })
            .await;

            match result {
                Ok(()) => {
                    pending.drain(..len);
                    stats.persisted += len as u64;
                    stats.flushes += 1;
                    record_append(
                        sink.name(),
                        "ok",
                        len,
                        started.elapsed().as_secs_f64() * 1000.0,
                    );
                }
                Err(e) => {
                    let lost = pending.len();
                    record_dropped(sink.name(), lost);
                    stats.dropped += lost as u64;
                    pending.clear();
                    error!(records = lost, "Telemetry lost at shutdown: {}", e);
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
