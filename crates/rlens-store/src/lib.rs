//! Telemetry persistence for analysis sessions.
//!
//! This crate provides:
//! - The [`TelemetrySink`] interface for signal record destinations
//! - In-memory and JSONL file sinks
//! - A background [`BatchWriter`] with flush cadence and backoff
//! - Retry with exponential backoff and jitter

pub mod error;
pub mod metrics;
pub mod retry;
pub mod sink;
pub mod writer;

pub use error::{StoreError, StoreResult};
pub use retry::{with_retry, RetryConfig};
pub use sink::{JsonlSink, MemorySink, TelemetrySink};
pub use writer::{BatchWriter, WriterConfig, WriterFeed, WriterStats};
