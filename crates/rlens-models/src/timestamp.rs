//! Session-relative clock offset formatting.
//!
//! Timeline entries display offsets as `M:SS` relative to session start
//! (e.g. `0:07`, `12:45`). Minutes are unpadded and may exceed 59.

/// Format a millisecond offset as `M:SS`, truncating sub-second remainder.
///
/// # Examples
/// ```
/// use rlens_models::timestamp::format_offset;
/// assert_eq!(format_offset(0), "0:00");
/// assert_eq!(format_offset(7_499), "0:07");
/// assert_eq!(format_offset(765_000), "12:45");
/// ```
pub fn format_offset(offset_ms: u64) -> String {
    let total_secs = offset_ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Parse a `M:SS` offset back to milliseconds.
pub fn parse_offset(offset: &str) -> Result<u64, OffsetError> {
    let offset = offset.trim();
    if offset.is_empty() {
        return Err(OffsetError::Empty);
    }

    let (minutes, seconds) = offset
        .split_once(':')
        .ok_or_else(|| OffsetError::InvalidFormat(offset.to_string()))?;

    let minutes: u64 = minutes
        .parse()
        .map_err(|_| OffsetError::InvalidValue("minutes", minutes.to_string()))?;
    let seconds: u64 = seconds
        .parse()
        .map_err(|_| OffsetError::InvalidValue("seconds", seconds.to_string()))?;

    if seconds > 59 {
        return Err(OffsetError::InvalidValue("seconds", seconds.to_string()));
    }

    Ok((minutes * 60 + seconds) * 1000)
}

/// Offset parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetError {
    /// Offset string is empty
    Empty,
    /// Invalid numeric value for a component
    InvalidValue(&'static str, String),
    /// Offset is not in M:SS form
    InvalidFormat(String),
}

impl std::fmt::Display for OffsetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Offset cannot be empty"),
            Self::InvalidValue(component, value) => {
                write!(f, "Invalid {} value: {}", component, value)
            }
            Self::InvalidFormat(offset) => {
                write!(f, "Invalid offset format '{}'. Use M:SS", offset)
            }
        }
    }
}

impl std::error::Error for OffsetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(0), "0:00");
        assert_eq!(format_offset(999), "0:00");
        assert_eq!(format_offset(5_000), "0:05");
        assert_eq!(format_offset(61_000), "1:01");
        assert_eq!(format_offset(3_600_000), "60:00");
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("0:00").unwrap(), 0);
        assert_eq!(parse_offset("1:01").unwrap(), 61_000);
        assert_eq!(parse_offset("60:00").unwrap(), 3_600_000);
    }

    #[test]
    fn test_parse_offset_errors() {
        assert!(matches!(parse_offset(""), Err(OffsetError::Empty)));
        assert!(matches!(parse_offset("90"), Err(OffsetError::InvalidFormat(_))));
        assert!(matches!(
            parse_offset("1:75"),
            Err(OffsetError::InvalidValue("seconds", _))
        ));
        assert!(matches!(
            parse_offset("x:10"),
            Err(OffsetError::InvalidValue("minutes", _))
        ));
    }

    #[test]
    fn test_round_trip_truncates_to_second() {
        let formatted = format_offset(7_499);
        assert_eq!(parse_offset(&formatted).unwrap(), 7_000);
    }
}
