//! Error types for analysis operations.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while building or validating rule catalogs.
/// The per-tick pipeline itself never errors; malformed input is
/// filtered and classification always resolves to a state.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid rule '{rule}': {message}")]
    InvalidRule { rule: String, message: String },

    #[error("Invalid rule table '{table}': {message}")]
    InvalidTable { table: String, message: String },
}

impl AnalysisError {
    /// Create an invalid rule error.
    pub fn invalid_rule(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create an invalid table error.
    pub fn invalid_table(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTable {
            table: table.into(),
            message: message.into(),
        }
    }
}
