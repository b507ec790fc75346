//! Per-user weekly schedule storage.

use crate::error::StoreError;
use crate::lesson::Lesson;
use crate::weekday::Weekday;
use classmate_core::UserIdentity;
use dashmap::DashMap;
use std::collections::BTreeMap;

/// Lessons of one day, in the order they were entered.
pub type DaySchedule = Vec<Lesson>;

/// Saved days of one week. Only explicitly saved days are present; the
/// `BTreeMap` keeps them in Monday-first order.
pub type WeekSchedule = BTreeMap<Weekday, DaySchedule>;

/// Trait for schedule storage.
///
/// Implementations are shared between concurrent sessions of many users
/// and must not let one user's writes disturb another's week. All access
/// is keyed by the caller-supplied identity; no authorization is done here.
pub trait ScheduleStore: Send + Sync {
    /// Replaces the lessons of `day` for `user`.
    fn save(&self, user: UserIdentity, day: Weekday, lessons: DaySchedule)
    -> Result<(), StoreError>;

    /// Gets the lessons of `day` for `user`.
    ///
    /// Returns [`StoreError::NotFound`] both for unknown users and for days
    /// that were never saved.
    fn get(&self, user: UserIdentity, day: Weekday) -> Result<DaySchedule, StoreError>;

    /// Gets every saved day for `user`.
    fn get_week(&self, user: UserIdentity) -> Result<WeekSchedule, StoreError>;

    /// Saves several days at once.
    fn save_week(&self, user: UserIdentity, week: WeekSchedule) -> Result<(), StoreError> {
        for (day, lessons) in week {
            self.save(user, day, lessons)?;
        }
        Ok(())
    }
}

/// In-process schedule store.
///
/// Weeks are kept in a sharded map so that users on different shards never
/// contend; writes to one user's week hold only that user's entry.
#[derive(Debug, Default)]
pub struct InMemoryScheduleStore {
    weeks: DashMap<UserIdentity, WeekSchedule>,
}

impl InMemoryScheduleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one saved day.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.weeks.len()
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn save(
        &self,
        user: UserIdentity,
        day: Weekday,
        lessons: DaySchedule,
    ) -> Result<(), StoreError> {
        tracing::debug!(%user, ?day, lessons = lessons.len(), "Saving day schedule");
        self.weeks.entry(user).or_default().insert(day, lessons);
        Ok(())
    }

    fn get(&self, user: UserIdentity, day: Weekday) -> Result<DaySchedule, StoreError> {
        self.weeks
            .get(&user)
            .and_then(|week| week.get(&day).cloned())
            .ok_or(StoreError::NotFound {
                user,
                day: Some(day),
            })
    }

    fn get_week(&self, user: UserIdentity) -> Result<WeekSchedule, StoreError> {
        self.weeks
            .get(&user)
            .map(|week| week.value().clone())
            .ok_or(StoreError::NotFound { user, day: None })
    }

    fn save_week(&self, user: UserIdentity, week: WeekSchedule) -> Result<(), StoreError> {
        tracing::debug!(%user, days = week.len(), "Saving week schedule");
        let mut saved = self.weeks.entry(user).or_default();
        saved.extend(week);
        Ok(())
    }
}
