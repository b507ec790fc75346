//! Weekly class schedules for classmate.
//!
//! This crate provides:
//!
//! - **Weekday Resolver**: localized day names to [`Weekday`] and back
//! - **Lesson Parser**: one `name | start | end | location | teacher` line to a [`Lesson`]
//! - **Schedule Store**: per-user week of lessons behind [`ScheduleStore`]
//! - **Week parity**: numerator/denominator labeling for biweekly rotation

pub mod error;
pub mod lesson;
pub mod parity;
pub mod store;
pub mod weekday;

pub use error::{FormatError, StoreError};
pub use lesson::{Lesson, LessonParser};
pub use parity::WeekParity;
pub use store::{DaySchedule, InMemoryScheduleStore, ScheduleStore, WeekSchedule};
pub use weekday::{Locale, Weekday};
