//! The schedule-entry state machine.
//!
//! [`ScheduleEntry`] owns one [`ConversationSession`] per user in a sharded
//! map. Every operation on a user holds that user's map entry for its whole
//! duration, commit and removal included, so two messages of the same user
//! never interleave while different users proceed in parallel.

use crate::error::ConversationError;
use crate::prompt::{CANCEL_COMMAND, OutboundPrompt};
use crate::session::{ConversationSession, EntryStep, Transition};
use chrono::{DateTime, Local, TimeDelta, Utc};
use classmate_core::UserIdentity;
use classmate_timetable::{LessonParser, Locale, ScheduleStore};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;

/// Per-user schedule-entry conversations backed by a schedule store.
pub struct ScheduleEntry {
    sessions: DashMap<UserIdentity, ConversationSession>,
    store: Arc<dyn ScheduleStore>,
    locale: Locale,
    parser: LessonParser,
}

impl ScheduleEntry {
    /// Creates a state machine that commits into `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ScheduleStore>, locale: Locale) -> Self {
        Self {
            sessions: DashMap::new(),
            store,
            locale,
            parser: LessonParser::default(),
        }
    }

    /// Replaces the lesson parser.
    #[must_use]
    pub fn with_parser(mut self, parser: LessonParser) -> Self {
        self.parser = parser;
        self
    }

    /// Locale of prompts and accepted tokens.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Starts schedule entry for `user`, discarding any draft in progress.
    #[tracing::instrument(skip_all, fields(user = %user))]
    pub fn begin_session(&self, user: UserIdentity) -> OutboundPrompt {
        let session = ConversationSession::new(user, Local::now().date_naive());
        tracing::info!(session = %session.id, parity = ?session.week_parity, "Schedule entry started");

        if let Some(previous) = self.sessions.insert(user, session) {
            tracing::debug!(
                session = %previous.id,
                lessons = previous.drafted_lessons(),
                "Discarded previous draft"
            );
        }

        OutboundPrompt::ask_first_day(self.locale)
    }

    /// Advances the session of `user` by one message.
    ///
    /// The cancel command is honored here too, so a transport that does not
    /// route commands separately still lets the user back out.
    ///
    /// # Errors
    ///
    /// Returns [`ConversationError::NoSession`] if `user` has no open
    /// session, and [`ConversationError::CommitFailed`] if the finished draft
    /// could not be saved. In the latter case the session stays open.
    #[tracing::instrument(skip_all, fields(user = %user))]
    pub fn handle_text(
        &self,
        user: UserIdentity,
        text: &str,
    ) -> Result<OutboundPrompt, ConversationError> {
        if text.trim() == CANCEL_COMMAND {
            return if self.cancel_session(user) {
                Ok(OutboundPrompt::cancelled(self.locale))
            } else {
                Err(ConversationError::NoSession { user })
            };
        }

        let Entry::Occupied(mut entry) = self.sessions.entry(user) else {
            return Err(ConversationError::NoSession { user });
        };

        match entry.get_mut().advance(text, self.locale, &self.parser) {
            Transition::Reply(prompt) => Ok(prompt),
            Transition::Commit => {
                let draft = entry.get().draft.clone();
                let days = draft.len();

                if let Err(e) = self.store.save_week(user, draft) {
                    tracing::error!(session = %entry.get().id, error = %e, "Failed to commit schedule");
                    return Err(ConversationError::CommitFailed {
                        user,
                        reason: e.to_string(),
                    });
                }

                let session = entry.remove();
                tracing::info!(
                    session = %session.id,
                    days,
                    lessons = session.drafted_lessons(),
                    "Schedule committed"
                );
                Ok(OutboundPrompt::saved(self.locale, days))
            }
        }
    }

    /// Drops the session of `user` without saving anything.
    ///
    /// Returns whether a session was open.
    pub fn cancel_session(&self, user: UserIdentity) -> bool {
        match self.sessions.remove(&user) {
            Some((_, session)) => {
                tracing::info!(%user, session = %session.id, "Schedule entry cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether `user` is in the middle of schedule entry.
    #[must_use]
    pub fn has_session(&self, user: UserIdentity) -> bool {
        self.sessions.contains_key(&user)
    }

    /// Current step of the session of `user`.
    #[must_use]
    pub fn step(&self, user: UserIdentity) -> Option<EntryStep> {
        self.sessions.get(&user).map(|session| session.step)
    }

    /// Number of open sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Removes sessions idle for longer than `max_idle`.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Utc::now(), max_idle)
    }

    /// Removes sessions whose last message is older than `now - max_idle`.
    pub fn evict_idle_at(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let Some(cutoff) = TimeDelta::from_std(max_idle)
            .ok()
            .and_then(|idle| now.checked_sub_signed(idle))
        else {
            return 0;
        };

        let mut evicted = 0;
        self.sessions.retain(|user, session| {
            let keep = session.last_active_at >= cutoff;
            if !keep {
                tracing::info!(%user, session = %session.id, "Evicting idle schedule entry");
                evicted += 1;
            }
            keep
        });
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptKind;
    use classmate_timetable::{
        DaySchedule, InMemoryScheduleStore, StoreError, WeekSchedule, Weekday,
    };
    use std::sync::atomic::{AtomicBool, Ordering};

    const MATH: &str = "Math | 09:00 | 10:30 | Room 1 | Smith";

    fn setup() -> (Arc<InMemoryScheduleStore>, ScheduleEntry) {
        let store = Arc::new(InMemoryScheduleStore::new());
        let entry = ScheduleEntry::new(store.clone(), Locale::English);
        (store, entry)
    }

    fn send(entry: &ScheduleEntry, user: UserIdentity, text: &str) -> OutboundPrompt {
        entry.handle_text(user, text).expect("handled")
    }

    #[test]
    fn single_lesson_scenario() {
        let (store, entry) = setup();
        let user = UserIdentity::new(1);

        let prompt = entry.begin_session(user);
        assert_eq!(prompt.kind, PromptKind::AskDay);
        assert_eq!(prompt.choices.len(), 8);

        send(&entry, user, "Monday");
        send(&entry, user, MATH);
        send(&entry, user, "done");
        let prompt = send(&entry, user, "no");

        assert_eq!(prompt.kind, PromptKind::Saved { days: 1 });
        assert!(!entry.has_session(user));

        let monday = store.get(user, Weekday::Monday).expect("monday saved");
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].name, "Math");
        assert_eq!(monday[0].start_label(), "09:00");
        assert_eq!(monday[0].end_label(), "10:30");
        assert!(store.get(user, Weekday::Tuesday).unwrap_err().is_not_found());
    }

    #[test]
    fn four_field_line_keeps_waiting_for_lessons() {
        let (store, entry) = setup();
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        send(&entry, user, "Monday");
        let prompt = send(&entry, user, "Math | 09:00 | 10:30 | Room 1");

        assert!(matches!(prompt.kind, PromptKind::InvalidLesson { .. }));
        assert_eq!(entry.step(user), Some(EntryStep::AwaitingLessons));
        assert_eq!(store.user_count(), 0);

        let prompt = send(&entry, user, MATH);
        assert_eq!(
            prompt.kind,
            PromptKind::LessonAdded {
                day: Weekday::Monday,
                count: 1
            }
        );
    }

    #[test]
    fn empty_day_is_saved_as_empty_list() {
        let (store, entry) = setup();
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        for text in ["Monday", MATH, "done", "yes", "Tuesday", "done", "no"] {
            send(&entry, user, text);
        }

        assert_eq!(store.get(user, Weekday::Monday).expect("monday").len(), 1);
        assert_eq!(store.get(user, Weekday::Tuesday), Ok(Vec::new()));
    }

    #[test]
    fn cancel_in_any_state_leaves_store_unchanged() {
        let script = ["Monday", MATH, "done", "yes", "Tuesday", MATH];

        for steps in 0..=script.len() {
            let (store, entry) = setup();
            let user = UserIdentity::new(7);
            store
                .save(user, Weekday::Friday, Vec::new())
                .expect("seed");
            let before = store.get_week(user).expect("seeded");

            entry.begin_session(user);
            for text in &script[..steps] {
                send(&entry, user, text);
            }

            assert!(entry.cancel_session(user));
            assert!(!entry.has_session(user));
            assert_eq!(store.get_week(user), Ok(before));
        }
    }

    #[test]
    fn cancel_command_through_text() {
        let (store, entry) = setup();
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        send(&entry, user, "Monday");
        send(&entry, user, MATH);
        let prompt = send(&entry, user, " /cancel ");

        assert_eq!(prompt.kind, PromptKind::Cancelled);
        assert!(!entry.has_session(user));
        assert_eq!(store.user_count(), 0);
    }

    #[test]
    fn text_without_session_is_rejected() {
        let (_, entry) = setup();
        let user = UserIdentity::new(1);

        assert_eq!(
            entry.handle_text(user, "Monday"),
            Err(ConversationError::NoSession { user })
        );
        assert_eq!(
            entry.handle_text(user, CANCEL_COMMAND),
            Err(ConversationError::NoSession { user })
        );
        assert!(!entry.cancel_session(user));
    }

    #[test]
    fn begin_again_discards_previous_draft() {
        let (store, entry) = setup();
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        send(&entry, user, "Monday");
        send(&entry, user, MATH);

        entry.begin_session(user);
        assert_eq!(entry.step(user), Some(EntryStep::AwaitingDay));
        for text in ["Wednesday", "done", "no"] {
            send(&entry, user, text);
        }

        let week = store.get_week(user).expect("week");
        assert_eq!(week.keys().copied().collect::<Vec<_>>(), vec![Weekday::Wednesday]);
    }

    #[test]
    fn commit_replaces_previously_saved_day() {
        let (store, entry) = setup();
        let user = UserIdentity::new(1);
        store
            .save(user, Weekday::Monday, vec![
                classmate_timetable::LessonParser::default()
                    .parse("Old | 08:00 | 09:00 | | ")
                    .expect("valid"),
            ])
            .expect("seed");

        entry.begin_session(user);
        for text in ["Monday", MATH, "done", "no"] {
            send(&entry, user, text);
        }

        let monday = store.get(user, Weekday::Monday).expect("monday");
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0].name, "Math");
    }

    #[test]
    fn sessions_of_different_users_are_independent() {
        let (store, entry) = setup();
        let alice = UserIdentity::new(1);
        let bob = UserIdentity::new(2);

        entry.begin_session(alice);
        entry.begin_session(bob);
        send(&entry, alice, "Monday");
        send(&entry, bob, "Friday");
        send(&entry, alice, MATH);
        send(&entry, bob, "done");
        send(&entry, bob, "no");

        assert!(entry.has_session(alice));
        assert!(!entry.has_session(bob));
        assert_eq!(store.get(bob, Weekday::Friday), Ok(Vec::new()));
        assert!(store.get(alice, Weekday::Monday).is_err());
        assert_eq!(entry.step(alice), Some(EntryStep::AwaitingLessons));
    }

    #[test]
    fn concurrent_users_commit_their_own_weeks() {
        let (store, entry) = setup();
        let entry = Arc::new(entry);

        let handles: Vec<_> = (0..8)
            .map(|raw| {
                let entry = Arc::clone(&entry);
                std::thread::spawn(move || {
                    let user = UserIdentity::new(raw);
                    entry.begin_session(user);
                    for text in ["Thursday", MATH, MATH, "done", "no"] {
                        entry.handle_text(user, text).expect("handled");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        assert_eq!(entry.session_count(), 0);
        for raw in 0..8 {
            let day = store
                .get(UserIdentity::new(raw), Weekday::Thursday)
                .expect("saved");
            assert_eq!(day.len(), 2);
        }
    }

    #[test]
    fn concurrent_lines_of_one_user_are_all_applied() {
        let (store, entry) = setup();
        let entry = Arc::new(entry);
        let user = UserIdentity::new(3);

        entry.begin_session(user);
        send(&entry, user, "Monday");

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let entry = Arc::clone(&entry);
                std::thread::spawn(move || {
                    for n in 0..25 {
                        let line = format!("Subject {worker}-{n} | 09:00 | 10:30 | | ");
                        entry.handle_text(user, &line).expect("handled");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        let drafted = entry
            .sessions
            .get(&user)
            .map(|session| session.drafted_lessons());
        assert_eq!(drafted, Some(200));

        send(&entry, user, "done");
        send(&entry, user, "no");

        let mut names: Vec<String> = store
            .get(user, Weekday::Monday)
            .expect("saved")
            .into_iter()
            .map(|lesson| lesson.name)
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 200);
        assert!(names.contains(&"Subject 7-24".to_string()));
    }

    struct FlakyStore {
        inner: InMemoryScheduleStore,
        failing: AtomicBool,
    }

    impl ScheduleStore for FlakyStore {
        fn save(
            &self,
            user: UserIdentity,
            day: Weekday,
            lessons: DaySchedule,
        ) -> Result<(), StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StoreError::Internal {
                    reason: "out of memory".to_string(),
                });
            }
            self.inner.save(user, day, lessons)
        }

        fn get(&self, user: UserIdentity, day: Weekday) -> Result<DaySchedule, StoreError> {
            self.inner.get(user, day)
        }

        fn get_week(&self, user: UserIdentity) -> Result<WeekSchedule, StoreError> {
            self.inner.get_week(user)
        }
    }

    #[test]
    fn failed_commit_keeps_session_for_retry() {
        let store = Arc::new(FlakyStore {
            inner: InMemoryScheduleStore::new(),
            failing: AtomicBool::new(true),
        });
        let entry = ScheduleEntry::new(store.clone(), Locale::English);
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        for text in ["Monday", MATH, "done"] {
            send(&entry, user, text);
        }

        let err = entry.handle_text(user, "no").unwrap_err();
        assert!(matches!(err, ConversationError::CommitFailed { .. }));
        assert_eq!(entry.step(user), Some(EntryStep::AwaitingContinue));

        store.failing.store(false, Ordering::SeqCst);
        let prompt = send(&entry, user, "no");
        assert_eq!(prompt.kind, PromptKind::Saved { days: 1 });
        assert_eq!(store.get(user, Weekday::Monday).expect("saved").len(), 1);
    }

    #[test]
    fn strict_parser_is_used_when_configured() {
        let store = Arc::new(InMemoryScheduleStore::new());
        let entry =
            ScheduleEntry::new(store, Locale::English).with_parser(LessonParser::strict());
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        send(&entry, user, "Monday");
        let prompt = send(&entry, user, "Night | 22:00 | 06:00 | | ");

        assert!(matches!(prompt.kind, PromptKind::InvalidLesson { .. }));
    }

    #[test]
    fn evicts_only_idle_sessions() {
        let (_, entry) = setup();
        let user = UserIdentity::new(1);
        entry.begin_session(user);

        let max_idle = Duration::from_secs(30 * 60);
        assert_eq!(entry.evict_idle(max_idle), 0);
        assert!(entry.has_session(user));

        let later = Utc::now() + TimeDelta::hours(1);
        assert_eq!(entry.evict_idle_at(later, max_idle), 1);
        assert!(!entry.has_session(user));
        assert_eq!(entry.session_count(), 0);
    }

    #[test]
    fn russian_locale_flow() {
        let store = Arc::new(InMemoryScheduleStore::new());
        let entry = ScheduleEntry::new(store.clone(), Locale::Russian);
        let user = UserIdentity::new(1);

        entry.begin_session(user);
        for text in [
            "понедельник",
            "Математика | 09:00 | 10:30 | Ауд. 101 | Иванов И.И.",
            "/done",
            "нет",
        ] {
            send(&entry, user, text);
        }

        let monday = store.get(user, Weekday::Monday).expect("saved");
        assert_eq!(monday[0].name, "Математика");
    }
}
