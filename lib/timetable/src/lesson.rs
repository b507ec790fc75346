//! Lessons and the one-line lesson format.
//!
//! A lesson line has five `|`-separated fields:
//!
//! ```text
//! Math | 09:00 | 10:30 | Room 1 | Smith
//! ```
//!
//! Name, start, end, location and teacher, in that order. Location and
//! teacher may be left empty.

use crate::error::FormatError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Separator between the fields of a lesson line.
pub const FIELD_SEPARATOR: char = '|';

/// Number of fields in a lesson line.
pub const FIELD_COUNT: usize = 5;

const TIME_FORMAT: &str = "%H:%M";

/// One class in a day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Subject name, never empty.
    pub name: String,
    /// Wall-clock start time.
    pub start: NaiveTime,
    /// Wall-clock end time.
    pub end: NaiveTime,
    /// Room or building.
    pub location: Option<String>,
    /// Who teaches it.
    pub teacher: Option<String>,
}

impl Lesson {
    /// Creates a lesson without location or teacher.
    #[must_use]
    pub fn new(name: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            location: None,
            teacher: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the teacher.
    #[must_use]
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    /// Start time as `HH:MM`.
    #[must_use]
    pub fn start_label(&self) -> String {
        self.start.format(TIME_FORMAT).to_string()
    }

    /// End time as `HH:MM`.
    #[must_use]
    pub fn end_label(&self) -> String {
        self.end.format(TIME_FORMAT).to_string()
    }

    /// Formats the lesson back into a five-field line.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "{} | {} | {} | {} | {}",
            self.name,
            self.start_label(),
            self.end_label(),
            self.location.as_deref().unwrap_or_default(),
            self.teacher.as_deref().unwrap_or_default(),
        )
    }
}

/// Parses lesson lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LessonParser {
    strict_times: bool,
}

impl LessonParser {
    /// A parser that accepts lessons ending before they start.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            strict_times: false,
        }
    }

    /// A parser that rejects lessons whose end is not after their start.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict_times: true }
    }

    /// Whether `start < end` is enforced.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict_times
    }

    /// Parses one lesson line.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the line does not have exactly five
    /// fields, the name is empty, either time is not `HH:MM`, or (strict
    /// parsing only) the lesson does not end after it starts.
    pub fn parse(&self, line: &str) -> Result<Lesson, FormatError> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();
        let &[name, start, end, location, teacher] = fields.as_slice() else {
            return Err(FormatError::FieldCount {
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        };

        if name.is_empty() {
            return Err(FormatError::EmptyName);
        }

        let start_time = parse_time("start", start)?;
        let end_time = parse_time("end", end)?;

        if self.strict_times && start_time >= end_time {
            return Err(FormatError::InvertedTimes {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Lesson {
            name: name.to_string(),
            start: start_time,
            end: end_time,
            location: non_empty(location),
            teacher: non_empty(teacher),
        })
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, FormatError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|e| FormatError::InvalidTime {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
