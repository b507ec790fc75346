//! Outbound prompts and the words the conversation listens for.
//!
//! A prompt is a description of what to show next: the text, plus the
//! closed list of day names whenever the next expected answer is a day.
//! How it is rendered is up to the transport.

use classmate_timetable::{FormatError, Locale, Weekday};
use serde::Serialize;

/// Command that abandons schedule entry. Offered next to the day choices.
pub const CANCEL_COMMAND: &str = "/cancel";

/// Word that finishes the lesson list of the current day.
#[must_use]
pub fn completion_token(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "/done",
        Locale::English => "done",
    }
}

/// Word that asks for another day. Anything else finishes the entry.
#[must_use]
pub fn affirmative_token(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "да",
        Locale::English => "yes",
    }
}

/// What a prompt is answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptKind {
    /// Waiting for a day name.
    AskDay,
    /// The last message was not a day name.
    InvalidDay,
    /// Day accepted, waiting for lesson lines.
    AskLessons { day: Weekday },
    /// Lesson appended to the day.
    LessonAdded { day: Weekday, count: usize },
    /// The last message was not a valid lesson line.
    InvalidLesson { reason: String },
    /// Day finished, waiting for yes/no.
    AskContinue { day: Weekday },
    /// Draft written to the schedule store; the session is over.
    Saved { days: usize },
    /// Session abandoned without saving.
    Cancelled,
}

/// The next thing to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundPrompt {
    /// Machine-readable meaning of the prompt.
    pub kind: PromptKind,
    /// Text to send.
    pub text: String,
    /// Answer choices to offer, empty when free text is expected.
    pub choices: Vec<String>,
}

impl OutboundPrompt {
    fn plain(kind: PromptKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            choices: Vec::new(),
        }
    }

    fn with_day_choices(mut self, locale: Locale) -> Self {
        self.choices = locale
            .day_names()
            .iter()
            .map(|name| (*name).to_string())
            .chain(std::iter::once(CANCEL_COMMAND.to_string()))
            .collect();
        self
    }

    /// First prompt of a session.
    #[must_use]
    pub fn ask_first_day(locale: Locale) -> Self {
        let text = match locale {
            Locale::Russian => {
                "📝 Введите расписание. Сначала укажите день недели (например, 'Понедельник')\n\
                 Или отправьте /cancel для отмены"
            }
            Locale::English => {
                "📝 Let's enter your schedule. First pick a day of the week (for example, 'Monday')\n\
                 Or send /cancel to stop"
            }
        };
        Self::plain(PromptKind::AskDay, text).with_day_choices(locale)
    }

    /// Prompt after the user asked to add another day.
    #[must_use]
    pub fn ask_next_day(locale: Locale) -> Self {
        let text = match locale {
            Locale::Russian => "Выберите следующий день недели:",
            Locale::English => "Pick the next day of the week:",
        };
        Self::plain(PromptKind::AskDay, text).with_day_choices(locale)
    }

    /// Re-prompt after an unrecognized day name.
    #[must_use]
    pub fn invalid_day(locale: Locale) -> Self {
        let text = match locale {
            Locale::Russian => "Неверный день недели. Пожалуйста, выберите день из списка:",
            Locale::English => "Unknown day of the week. Please pick one from the list:",
        };
        Self::plain(PromptKind::InvalidDay, text).with_day_choices(locale)
    }

    /// Asks for the lessons of `day`.
    #[must_use]
    pub fn ask_lessons(locale: Locale, day: Weekday) -> Self {
        let done = completion_token(locale);
        let text = match locale {
            Locale::Russian => format!(
                "📅 Введите пары для {} в формате:\n\
                 <Название> | <Начало> | <Конец> | <Аудитория> | <Преподаватель>\n\n\
                 Пример:\n\
                 Математика | 09:00 | 10:30 | Ауд. 101 | Иванов И.И.\n\n\
                 Когда закончите, отправьте {done}",
                locale.display(day)
            ),
            Locale::English => format!(
                "📅 Enter the lessons for {} as:\n\
                 <Name> | <Start> | <End> | <Room> | <Teacher>\n\n\
                 Example:\n\
                 Math | 09:00 | 10:30 | Room 101 | Smith\n\n\
                 Send {done} when you are finished",
                locale.display(day)
            ),
        };
        Self::plain(PromptKind::AskLessons { day }, text)
    }

    /// Acknowledges a lesson.
    #[must_use]
    pub fn lesson_added(locale: Locale, day: Weekday, count: usize) -> Self {
        let done = completion_token(locale);
        let text = match locale {
            Locale::Russian => {
                format!("✅ Пара добавлена. Введите следующую или {done} для завершения")
            }
            Locale::English => format!("✅ Lesson added. Enter the next one or {done} to finish"),
        };
        Self::plain(PromptKind::LessonAdded { day, count }, text)
    }

    /// Re-prompt after a malformed lesson line.
    #[must_use]
    pub fn invalid_lesson(locale: Locale, error: &FormatError) -> Self {
        let text = match locale {
            Locale::Russian => {
                "Неверный формат. Пожалуйста, используйте формат:\n\
                 Название | Начало | Конец | Аудитория | Преподаватель"
            }
            Locale::English => {
                "Wrong format. Please use:\n\
                 Name | Start | End | Room | Teacher"
            }
        };
        Self::plain(
            PromptKind::InvalidLesson {
                reason: error.to_string(),
            },
            text,
        )
    }

    /// Asks whether to enter another day.
    #[must_use]
    pub fn ask_continue(locale: Locale, day: Weekday) -> Self {
        let text = match locale {
            Locale::Russian => format!(
                "День {} сохранен. Хотите добавить еще один день? (да/нет)",
                locale.display(day)
            ),
            Locale::English => format!(
                "{} is done. Do you want to add another day? (yes/no)",
                locale.display(day)
            ),
        };
        Self::plain(PromptKind::AskContinue { day }, text)
    }

    /// Confirms the commit.
    #[must_use]
    pub fn saved(locale: Locale, days: usize) -> Self {
        let text = match locale {
            Locale::Russian => "✅ Расписание успешно сохранено!",
            Locale::English => "✅ Schedule saved!",
        };
        Self::plain(PromptKind::Saved { days }, text)
    }

    /// Confirms cancellation.
    #[must_use]
    pub fn cancelled(locale: Locale) -> Self {
        let text = match locale {
            Locale::Russian => "❌ Ввод расписания отменен",
            Locale::English => "❌ Schedule entry cancelled",
        };
        Self::plain(PromptKind::Cancelled, text)
    }
}
