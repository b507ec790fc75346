//! Bot commands.

use classmate_timetable::Locale;
use teloxide::types::BotCommand;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начало работы")]
    Start,
    #[command(description = "справка")]
    Help,
    #[command(description = "установить расписание")]
    SetSchedule,
    #[command(description = "выбрать период для просмотра")]
    Schedule,
    #[command(description = "расписание на сегодня")]
    Today,
    #[command(description = "расписание на завтра")]
    Tomorrow,
    #[command(description = "расписание на неделю")]
    Week,
    #[command(description = "задать вопрос AI-помощнику")]
    Ask(String),
    #[command(description = "отменить ввод расписания")]
    Cancel,
}

/// Command menu registered with Telegram, described in `locale`.
#[must_use]
pub fn bot_commands(locale: Locale) -> Vec<BotCommand> {
    let mut commands = Command::bot_commands();
    if locale == Locale::English {
        for command in &mut commands {
            if let Some(description) = english_description(command.command.trim_start_matches('/')) {
                command.description = description.to_string();
            }
        }
    }
    commands
}

fn english_description(command: &str) -> Option<&'static str> {
    Some(match command {
        "start" => "get started",
        "help" => "show help",
        "setschedule" => "enter your schedule",
        "schedule" => "pick a period to view",
        "today" => "today's classes",
        "tomorrow" => "tomorrow's classes",
        "week" => "classes for the week",
        "ask" => "ask the AI assistant",
        "cancel" => "cancel schedule entry",
        _ => return None,
    })
}

/// Period offered by the `/schedule` menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleView {
    Today,
    Tomorrow,
    Week,
}

impl ScheduleView {
    pub const ALL: [ScheduleView; 3] = [Self::Today, Self::Tomorrow, Self::Week];

    /// Callback payload of the menu button.
    #[must_use]
    pub const fn callback_data(self) -> &'static str {
        match self {
            Self::Today => "schedule_today",
            Self::Tomorrow => "schedule_tomorrow",
            Self::Week => "schedule_week",
        }
    }

    /// Inverse of [`ScheduleView::callback_data`].
    #[must_use]
    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|view| view.callback_data() == data)
    }
}
