//! Classified state labels.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a discrete classified state, e.g. "High Engagement".
///
/// Labels come from the rule catalogs; the empty-scene sentinel and the
/// residual fallback are configured per catalog and are guaranteed distinct
/// by catalog validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StateLabel(pub String);

impl StateLabel {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StateLabel {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for StateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_transparent() {
        let label = StateLabel::from("High Engagement");
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, r#""High Engagement""#);
    }
}
