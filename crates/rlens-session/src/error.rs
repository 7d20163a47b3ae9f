//! Session error types.

use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Session task failed: {0}")]
    TaskFailed(String),

    #[error("Analysis error: {0}")]
    Analysis(#[from] rlens_analysis::AnalysisError),
}

impl SessionError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn task_failed(msg: impl Into<String>) -> Self {
        Self::TaskFailed(msg.into())
    }
}
