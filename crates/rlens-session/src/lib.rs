//! Analysis session engine.
//!
//! This crate provides:
//! - The [`FacePerception`] collaborator interface hosts implement
//! - Session configuration with per-mode profiles
//! - The [`AnalysisSession`] engine: two periodic timer tasks over a shared
//!   tracker, a typed event stream, and a clean stop/report lifecycle
//! - Telemetry feeding into an `rlens-store` sink

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod perception;


pub use clock::SessionClock;
pub use config::SessionConfig;
pub use engine::{AnalysisSession, SessionReport, SessionStats};
pub use error::{SessionError, SessionResult};
pub use events::SessionEvent;
pub use perception::{FacePerception, FaceRegion, PerceptionError, PerceptionResult};
