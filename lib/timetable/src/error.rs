//! Error types for the timetable crate.
//!
//! - `FormatError`: malformed user input (day name or lesson line)
//! - `StoreError`: schedule store lookups and failures

use crate::weekday::Weekday;
use classmate_core::UserIdentity;
use std::fmt;

/// Malformed user input. Always recoverable by asking again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Text is not a day name of the active vocabulary.
    UnknownWeekday { input: String },
    /// Lesson line did not split into the expected number of fields.
    FieldCount { expected: usize, found: usize },
    /// Lesson name was empty after trimming.
    EmptyName,
    /// A time field was not `HH:MM`.
    InvalidTime {
        field: &'static str,
        value: String,
        reason: String,
    },
    /// Lesson ends at or before its start (strict parsing only).
    InvertedTimes { start: String, end: String },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWeekday { input } => write!(f, "unknown weekday: '{input}'"),
            Self::FieldCount { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::EmptyName => write!(f, "lesson name is empty"),
            Self::InvalidTime {
                field,
                value,
                reason,
            } => write!(f, "invalid {field} time '{value}': {reason}"),
            Self::InvertedTimes { start, end } => {
                write!(f, "lesson ends at {end}, not after its start {start}")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Errors from schedule store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No lessons recorded for the user, or for that day.
    NotFound {
        user: UserIdentity,
        day: Option<Weekday>,
    },
    /// The backing storage failed.
    Internal { reason: String },
}

impl StoreError {
    /// Returns true for the "nothing recorded" case.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound {
                user,
                day: Some(day),
            } => write!(f, "schedule not found for {user} on {day:?}"),
            Self::NotFound { user, day: None } => write!(f, "schedule not found for {user}"),
            Self::Internal { reason } => write!(f, "schedule storage failed: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_count_display() {
        let err = FormatError::FieldCount {
            expected: 5,
            found: 4,
        };
        assert_eq!(err.to_string(), "expected 5 fields, found 4");
    }

    #[test]
    fn invalid_time_display_carries_reason() {
        let err = FormatError::InvalidTime {
            field: "start",
            value: "25:00".to_string(),
            reason: "input is out of range".to_string(),
        };
        assert!(err.to_string().contains("25:00"));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound {
            user: UserIdentity::new(9),
            day: Some(Weekday::Tuesday),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Tuesday"));
    }
}
