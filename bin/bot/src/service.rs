//! Command dispatching, independent of the chat transport.
//!
//! [`BotService`] decides what to answer; the transport decides how to
//! render a [`Reply`]. Commands are handled first. Plain text goes to the
//! schedule-entry state machine when the user has a session open and is
//! ignored otherwise.

use crate::commands::{Command, ScheduleView};
use crate::error::BotError;
use crate::texts;
use crate::user::UserRepository;
use chrono::{Datelike, NaiveDate};
use classmate_ai::StudyAssistant;
use classmate_conversation::{ConversationError, OutboundPrompt, PromptKind, ScheduleEntry};
use classmate_core::{Result, UserIdentity};
use classmate_timetable::{LessonParser, Locale, ScheduleStore, WeekParity, Weekday};
use std::sync::Arc;

/// Extra affordance attached to a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave the current keyboard alone.
    None,
    /// Offer these answers as buttons.
    Choices(Vec<String>),
    /// Inline menu of schedule views.
    Menu(Vec<(String, ScheduleView)>),
    /// Hide a previously offered choice keyboard.
    Remove,
}

/// Something to send back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    /// A plain text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }
}

impl From<OutboundPrompt> for Reply {
    fn from(prompt: OutboundPrompt) -> Self {
        let keyboard = match prompt.kind {
            PromptKind::Saved { .. } | PromptKind::Cancelled => Keyboard::Remove,
            _ if !prompt.choices.is_empty() => Keyboard::Choices(prompt.choices),
            _ => Keyboard::None,
        };
        Self {
            text: prompt.text,
            keyboard,
        }
    }
}

/// The bot's behavior.
pub struct BotService {
    store: Arc<dyn ScheduleStore>,
    entry: ScheduleEntry,
    users: Arc<dyn UserRepository>,
    assistant: Option<StudyAssistant>,
    locale: Locale,
}

impl BotService {
    /// Creates a service over `store` with the default lesson parser and no
    /// study assistant.
    #[must_use]
    pub fn new(
        store: Arc<dyn ScheduleStore>,
        users: Arc<dyn UserRepository>,
        locale: Locale,
    ) -> Self {
        Self {
            entry: ScheduleEntry::new(Arc::clone(&store), locale),
            store,
            users,
            assistant: None,
            locale,
        }
    }

    /// Replaces the lesson parser used during schedule entry.
    #[must_use]
    pub fn with_parser(mut self, parser: LessonParser) -> Self {
        self.entry = self.entry.with_parser(parser);
        self
    }

    /// Enables `/ask`.
    #[must_use]
    pub fn with_assistant(mut self, assistant: StudyAssistant) -> Self {
        self.assistant = Some(assistant);
        self
    }

    /// The schedule-entry state machine.
    #[must_use]
    pub fn entry(&self) -> &ScheduleEntry {
        &self.entry
    }

    /// Locale of replies.
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Handles a command sent on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user registry, the schedule store or the
    /// study assistant fails.
    #[tracing::instrument(skip_all, fields(user = %user, command = ?command))]
    pub async fn handle_command(
        &self,
        user: UserIdentity,
        command: Command,
        today: NaiveDate,
    ) -> Result<Reply, BotError> {
        match command {
            Command::Start => self.start(user, today).await,
            Command::Help => Ok(Reply::text(texts::help(self.locale))),
            Command::SetSchedule => Ok(self.entry.begin_session(user).into()),
            Command::Cancel => Ok(if self.entry.cancel_session(user) {
                OutboundPrompt::cancelled(self.locale).into()
            } else {
                Reply::text(texts::nothing_to_cancel(self.locale))
            }),
            Command::Schedule => Ok(self.menu()),
            Command::Today => self.show(user, ScheduleView::Today, today),
            Command::Tomorrow => self.show(user, ScheduleView::Tomorrow, today),
            Command::Week => self.show(user, ScheduleView::Week, today),
            Command::Ask(question) => self.ask(&question).await,
        }
    }

    /// Feeds non-command text to the user's entry session.
    ///
    /// Returns `None` when the user has no session open.
    ///
    /// # Errors
    ///
    /// Returns an error if the finished schedule could not be saved. The
    /// session stays open in that case.
    pub fn handle_text(&self, user: UserIdentity, text: &str) -> Result<Option<Reply>, BotError> {
        match self.entry.handle_text(user, text) {
            Ok(prompt) => Ok(Some(prompt.into())),
            Err(ConversationError::NoSession { .. }) => {
                tracing::trace!(%user, "Ignoring text outside schedule entry");
                Ok(None)
            }
            Err(e @ ConversationError::CommitFailed { .. }) => Err(BotError::Store {
                details: e.to_string(),
            }
            .into()),
        }
    }

    /// Renders one schedule view as of `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule store fails. Missing schedules are
    /// rendered, not reported.
    pub fn show(
        &self,
        user: UserIdentity,
        view: ScheduleView,
        today: NaiveDate,
    ) -> Result<Reply, BotError> {
        let today = Weekday::from(today.weekday());
        match view {
            ScheduleView::Today => self.show_day(user, today),
            ScheduleView::Tomorrow => self.show_day(user, today.succ()),
            ScheduleView::Week => self.show_week(user),
        }
    }

    async fn start(&self, user: UserIdentity, today: NaiveDate) -> Result<Reply, BotError> {
        let known = self
            .users
            .user_exists(user)
            .await
            .map_err(|details| BotError::Users { details })?;
        if !known {
            self.users
                .create_user(user)
                .await
                .map_err(|details| BotError::Users { details })?;
        }

        Ok(Reply::text(texts::welcome(
            self.locale,
            WeekParity::of(today),
        )))
    }

    fn menu(&self) -> Reply {
        let buttons = ScheduleView::ALL
            .into_iter()
            .map(|view| {
                let label = match view {
                    ScheduleView::Today => texts::today_label(self.locale),
                    ScheduleView::Tomorrow => texts::tomorrow_label(self.locale),
                    ScheduleView::Week => texts::week_label(self.locale),
                };
                (label.to_string(), view)
            })
            .collect();
        Reply {
            text: texts::schedule_menu(self.locale).to_string(),
            keyboard: Keyboard::Menu(buttons),
        }
    }

    fn show_day(&self, user: UserIdentity, day: Weekday) -> Result<Reply, BotError> {
        match self.store.get(user, day) {
            Ok(lessons) => Ok(Reply::text(texts::day_schedule(self.locale, day, &lessons))),
            Err(e) if e.is_not_found() => Ok(Reply::text(texts::no_lessons(self.locale, day))),
            Err(e) => Err(BotError::Store {
                details: e.to_string(),
            }
            .into()),
        }
    }

    fn show_week(&self, user: UserIdentity) -> Result<Reply, BotError> {
        match self.store.get_week(user) {
            Ok(week) if week.is_empty() => Ok(Reply::text(texts::no_schedule(self.locale))),
            Ok(week) => Ok(Reply::text(texts::week_schedule(self.locale, &week))),
            Err(e) if e.is_not_found() => Ok(Reply::text(texts::no_schedule(self.locale))),
            Err(e) => Err(BotError::Store {
                details: e.to_string(),
            }
            .into()),
        }
    }

    async fn ask(&self, question: &str) -> Result<Reply, BotError> {
        let Some(assistant) = &self.assistant else {
            return Ok(Reply::text(texts::ask_disabled(self.locale)));
        };
        if question.trim().is_empty() {
            return Ok(Reply::text(texts::ask_usage(self.locale)));
        }

        let answer = assistant
            .ask(question)
            .await
            .map_err(|e| BotError::Assistant {
                details: e.to_string(),
            })?;
        Ok(Reply::text(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::InMemoryUserRepository;
    use async_trait::async_trait;
    use classmate_ai::{LlmBackend, LlmError, LlmRequest, LlmResponse, TokenUsage};
    use classmate_timetable::{DaySchedule, InMemoryScheduleStore, StoreError, WeekSchedule};

    // 2024-09-02 is a Monday in ISO week 36, a denominator week.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).expect("valid date")
    }

    fn service() -> (Arc<InMemoryScheduleStore>, Arc<InMemoryUserRepository>, BotService) {
        let store = Arc::new(InMemoryScheduleStore::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let service = BotService::new(store.clone(), users.clone(), Locale::English);
        (store, users, service)
    }

    async fn command(service: &BotService, user: UserIdentity, command: Command) -> Reply {
        service
            .handle_command(user, command, monday())
            .await
            .expect("command handled")
    }

    fn text(service: &BotService, user: UserIdentity, text: &str) -> Reply {
        service
            .handle_text(user, text)
            .expect("text handled")
            .expect("session open")
    }

    #[tokio::test]
    async fn start_registers_once_and_shows_parity() {
        let (_, users, service) = service();
        let user = UserIdentity::new(5);

        let reply = command(&service, user, Command::Start).await;
        command(&service, user, Command::Start).await;

        assert!(reply.text.contains("study week 2 (denominator)"));
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn entry_then_queries() {
        let (_, _, service) = service();
        let user = UserIdentity::new(1);

        let reply = command(&service, user, Command::SetSchedule).await;
        assert!(matches!(reply.keyboard, Keyboard::Choices(ref c) if c.len() == 8));

        text(&service, user, "Monday");
        text(&service, user, "Math | 09:00 | 10:30 | Room 1 | Smith");
        text(&service, user, "done");
        text(&service, user, "yes");
        text(&service, user, "Tuesday");
        text(&service, user, "done");
        let reply = text(&service, user, "no");
        assert_eq!(reply.keyboard, Keyboard::Remove);

        let today = command(&service, user, Command::Today).await;
        assert!(today.text.contains("1. Math"));

        let tomorrow = command(&service, user, Command::Tomorrow).await;
        assert_eq!(tomorrow.text, "No lessons on Tuesday 🎉");

        let week = command(&service, user, Command::Week).await;
        assert!(week.text.contains("📌 Monday:"));
        assert!(week.text.contains("📌 Tuesday:\n    No lessons"));
    }

    #[tokio::test]
    async fn unsaved_day_and_week_render_as_empty() {
        let (_, _, service) = service();
        let user = UserIdentity::new(1);

        let today = command(&service, user, Command::Today).await;
        assert_eq!(today.text, "No lessons on Monday 🎉");

        let week = command(&service, user, Command::Week).await;
        assert_eq!(week.text, texts::no_schedule(Locale::English));
    }

    #[tokio::test]
    async fn text_without_session_is_ignored() {
        let (_, _, service) = service();
        assert!(matches!(
            service.handle_text(UserIdentity::new(1), "hello"),
            Ok(None)
        ));
    }

    #[tokio::test]
    async fn cancel_command() {
        let (store, _, service) = service();
        let user = UserIdentity::new(1);

        let reply = command(&service, user, Command::Cancel).await;
        assert_eq!(reply.text, texts::nothing_to_cancel(Locale::English));

        command(&service, user, Command::SetSchedule).await;
        text(&service, user, "Friday");
        let reply = command(&service, user, Command::Cancel).await;

        assert_eq!(reply.keyboard, Keyboard::Remove);
        assert!(!service.entry().has_session(user));
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn schedule_menu_offers_three_views() {
        let (_, _, service) = service();
        let reply = command(&service, UserIdentity::new(1), Command::Schedule).await;

        let Keyboard::Menu(buttons) = reply.keyboard else {
            panic!("expected a menu");
        };
        let views: Vec<ScheduleView> = buttons.iter().map(|(_, view)| *view).collect();
        assert_eq!(views, ScheduleView::ALL.to_vec());
    }

    #[tokio::test]
    async fn strict_parser_is_applied() {
        let (_, _, service) = service();
        let service = service.with_parser(LessonParser::strict());
        let user = UserIdentity::new(1);

        command(&service, user, Command::SetSchedule).await;
        text(&service, user, "Monday");
        let reply = text(&service, user, "Night | 22:00 | 06:00 | | ");

        assert!(reply.text.starts_with("Wrong format"));
    }

    struct EchoBackend;

    #[async_trait]
    impl LlmBackend for EchoBackend {
        async fn generate(&self, request: &LlmRequest) -> std::result::Result<LlmResponse, LlmError> {
            Ok(LlmResponse {
                content: format!("echo: {}", request.prompt),
                usage: TokenUsage::default(),
                model: "echo".to_string(),
            })
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn ask_needs_assistant_and_question() {
        let (_, _, service) = service();
        let user = UserIdentity::new(1);

        let reply = command(&service, user, Command::Ask("hi".to_string())).await;
        assert_eq!(reply.text, texts::ask_disabled(Locale::English));

        let service = service.with_assistant(StudyAssistant::new(Arc::new(EchoBackend)));
        let reply = command(&service, user, Command::Ask(String::new())).await;
        assert_eq!(reply.text, texts::ask_usage(Locale::English));

        let reply = command(&service, user, Command::Ask("what is pi?".to_string())).await;
        assert_eq!(reply.text, "echo: what is pi?");
    }

    struct BrokenStore;

    impl ScheduleStore for BrokenStore {
        fn save(
            &self,
            _user: UserIdentity,
            _day: Weekday,
            _lessons: DaySchedule,
        ) -> std::result::Result<(), StoreError> {
            Err(StoreError::Internal {
                reason: "broken".to_string(),
            })
        }

        fn get(
            &self,
            _user: UserIdentity,
            _day: Weekday,
        ) -> std::result::Result<DaySchedule, StoreError> {
            Err(StoreError::Internal {
                reason: "broken".to_string(),
            })
        }

        fn get_week(&self, _user: UserIdentity) -> std::result::Result<WeekSchedule, StoreError> {
            Err(StoreError::Internal {
                reason: "broken".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn store_failures_are_errors() {
        let service = BotService::new(
            Arc::new(BrokenStore),
            Arc::new(InMemoryUserRepository::new()),
            Locale::English,
        );
        let user = UserIdentity::new(1);

        assert!(
            service
                .handle_command(user, Command::Today, monday())
                .await
                .is_err()
        );

        command(&service, user, Command::SetSchedule).await;
        for input in ["Monday", "done"] {
            text(&service, user, input);
        }
        assert!(service.handle_text(user, "no").is_err());
        assert!(service.entry().has_session(user));
    }
}
