//! Schedule-entry sessions.
//!
//! A session holds the draft week a user is typing in and the step the
//! conversation is on. Advancing a session is pure: it never touches the
//! schedule store. When the user declines to add another day the session
//! reports [`Transition::Commit`] and the owner writes the draft out.

use crate::prompt::{OutboundPrompt, affirmative_token, completion_token};
use chrono::{DateTime, NaiveDate, Utc};
use classmate_core::{ConversationSessionId, UserIdentity};
use classmate_timetable::{LessonParser, Locale, WeekParity, WeekSchedule, Weekday};
use serde::{Deserialize, Serialize};

/// Where a session is in the entry flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStep {
    /// Waiting for a day name.
    AwaitingDay,
    /// Collecting lesson lines for the active day.
    AwaitingLessons,
    /// Waiting for "another day?" to be answered.
    AwaitingContinue,
}

/// Result of feeding one message to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Stay in the conversation and show this prompt.
    Reply(OutboundPrompt),
    /// The user is finished; the draft should be committed.
    Commit,
}

/// A schedule-entry conversation for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    /// Unique session identifier.
    pub id: ConversationSessionId,
    /// The user typing the schedule.
    pub user: UserIdentity,
    /// Current step.
    pub step: EntryStep,
    /// Day lessons are currently being added to.
    pub active_day: Option<Weekday>,
    /// Days entered so far in this session.
    pub draft: WeekSchedule,
    /// Rotation week the session was started in.
    pub week_parity: WeekParity,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    /// When the session last received a message.
    pub last_active_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates a session waiting for its first day.
    #[must_use]
    pub fn new(user: UserIdentity, today: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationSessionId::new(),
            user,
            step: EntryStep::AwaitingDay,
            active_day: None,
            draft: WeekSchedule::new(),
            week_parity: WeekParity::of(today),
            started_at: now,
            last_active_at: now,
        }
    }

    /// Feeds one message to the session.
    pub fn advance(&mut self, text: &str, locale: Locale, parser: &LessonParser) -> Transition {
        self.last_active_at = Utc::now();

        match self.step {
            EntryStep::AwaitingDay => Transition::Reply(self.choose_day(text, locale)),
            EntryStep::AwaitingLessons => Transition::Reply(self.add_lesson(text, locale, parser)),
            EntryStep::AwaitingContinue => {
                if text.trim().to_lowercase() == affirmative_token(locale) {
                    self.step = EntryStep::AwaitingDay;
                    self.active_day = None;
                    Transition::Reply(OutboundPrompt::ask_next_day(locale))
                } else {
                    Transition::Commit
                }
            }
        }
    }

    fn choose_day(&mut self, text: &str, locale: Locale) -> OutboundPrompt {
        match locale.resolve(text) {
            Ok(day) => {
                // Re-entering a day replaces what was drafted for it.
                self.draft.insert(day, Vec::new());
                self.active_day = Some(day);
                self.step = EntryStep::AwaitingLessons;
                OutboundPrompt::ask_lessons(locale, day)
            }
            Err(e) => {
                tracing::debug!(session = %self.id, error = %e, "Day not recognized");
                OutboundPrompt::invalid_day(locale)
            }
        }
    }

    fn add_lesson(&mut self, text: &str, locale: Locale, parser: &LessonParser) -> OutboundPrompt {
        let Some(day) = self.active_day else {
            // Unreachable through `advance`, recover by asking for a day.
            self.step = EntryStep::AwaitingDay;
            return OutboundPrompt::ask_next_day(locale);
        };

        if text.trim().to_lowercase() == completion_token(locale) {
            self.step = EntryStep::AwaitingContinue;
            return OutboundPrompt::ask_continue(locale, day);
        }

        match parser.parse(text) {
            Ok(lesson) => {
                let lessons = self.draft.entry(day).or_default();
                lessons.push(lesson);
                OutboundPrompt::lesson_added(locale, day, lessons.len())
            }
            Err(e) => {
                tracing::debug!(session = %self.id, error = %e, "Lesson line rejected");
                OutboundPrompt::invalid_lesson(locale, &e)
            }
        }
    }

    /// Number of lessons drafted across all days.
    #[must_use]
    pub fn drafted_lessons(&self) -> usize {
        self.draft.values().map(Vec::len).sum()
    }
}
