//! Localized reply texts of the stateless commands.

use classmate_timetable::{Lesson, Locale, WeekParity, WeekSchedule, Weekday};
use std::fmt::Write;

pub fn welcome(locale: Locale, parity: WeekParity) -> String {
    match locale {
        Locale::Russian => format!(
            "Привет! Я бот для управления расписанием.\n\
             Сейчас {}-я учебная неделя ({}).\n\n\
             Основные команды:\n\
             /setschedule - установить расписание\n\
             /today - расписание на сегодня\n\
             /tomorrow - расписание на завтра\n\
             /week - расписание на неделю\n\
             /ask [вопрос] - задать вопрос AI-помощнику",
            parity.ordinal(),
            parity.label(locale)
        ),
        Locale::English => format!(
            "Hi! I keep track of your class schedule.\n\
             This is study week {} ({}).\n\n\
             Main commands:\n\
             /setschedule - enter your schedule\n\
             /today - today's lessons\n\
             /tomorrow - tomorrow's lessons\n\
             /week - the whole week\n\
             /ask [question] - ask the study assistant",
            parity.ordinal(),
            parity.label(locale)
        ),
    }
}

pub fn help(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => {
            "ℹ️ Доступные команды:\n\n\
             /start - Начало работы\n\
             /help - Эта справка\n\
             /setschedule - Установить расписание\n\
             /schedule - Выбрать период для просмотра\n\
             /today - Расписание на сегодня\n\
             /tomorrow - Расписание на завтра\n\
             /week - Расписание на неделю\n\
             /ask [вопрос] - Задать вопрос AI-помощнику\n\
             /cancel - Отменить ввод расписания"
        }
        Locale::English => {
            "ℹ️ Available commands:\n\n\
             /start - Get started\n\
             /help - This help\n\
             /setschedule - Enter your schedule\n\
             /schedule - Pick a period to view\n\
             /today - Today's lessons\n\
             /tomorrow - Tomorrow's lessons\n\
             /week - The whole week\n\
             /ask [question] - Ask the study assistant\n\
             /cancel - Stop entering the schedule"
        }
    }
}

pub fn schedule_menu(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Выберите период для просмотра расписания:",
        Locale::English => "Which period do you want to see?",
    }
}

pub fn today_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Сегодня",
        Locale::English => "Today",
    }
}

pub fn tomorrow_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Завтра",
        Locale::English => "Tomorrow",
    }
}

pub fn week_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Вся неделя",
        Locale::English => "Whole week",
    }
}

pub fn no_lessons(locale: Locale, day: Weekday) -> String {
    match locale {
        Locale::Russian => format!("На {} пар нет 🎉", locale.display(day)),
        Locale::English => format!("No lessons on {} 🎉", locale.display(day)),
    }
}

/// Numbered lessons of one day, or [`no_lessons`] for an empty day.
pub fn day_schedule(locale: Locale, day: Weekday, lessons: &[Lesson]) -> String {
    if lessons.is_empty() {
        return no_lessons(locale, day);
    }

    let mut out = match locale {
        Locale::Russian => format!("📅 Расписание на {}:\n\n", locale.display(day)),
        Locale::English => format!("📅 Lessons on {}:\n\n", locale.display(day)),
    };
    for (i, lesson) in lessons.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, lesson.name);
        let _ = writeln!(out, "   🕒 {} - {}", lesson.start_label(), lesson.end_label());
        if let Some(location) = &lesson.location {
            let _ = writeln!(out, "   🏫 {location}");
        }
        if let Some(teacher) = &lesson.teacher {
            let _ = writeln!(out, "   👨‍🏫 {teacher}");
        }
        out.push('\n');
    }
    out
}

/// Every saved day, Monday first.
pub fn week_schedule(locale: Locale, week: &WeekSchedule) -> String {
    let mut out = match locale {
        Locale::Russian => "📅 Ваше расписание на неделю:\n\n".to_string(),
        Locale::English => "📅 Your week:\n\n".to_string(),
    };
    for (day, lessons) in week {
        let _ = writeln!(out, "📌 {}:", locale.display(*day));
        if lessons.is_empty() {
            let none = match locale {
                Locale::Russian => "Пар нет",
                Locale::English => "No lessons",
            };
            let _ = writeln!(out, "    {none}");
        }
        for lesson in lessons {
            let _ = writeln!(
                out,
                "    🕒 {}-{} {}",
                lesson.start_label(),
                lesson.end_label(),
                lesson.name
            );
        }
        out.push('\n');
    }
    out
}

pub fn no_schedule(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Расписание еще не задано. Используйте /setschedule",
        Locale::English => "You have no schedule yet. Use /setschedule",
    }
}

pub fn nothing_to_cancel(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Нечего отменять",
        Locale::English => "Nothing to cancel",
    }
}

pub fn ask_usage(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Пожалуйста, задайте вопрос после команды /ask",
        Locale::English => "Please put your question after /ask",
    }
}

pub fn ask_disabled(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "AI-помощник не настроен",
        Locale::English => "The study assistant is not configured",
    }
}

pub fn generic_failure(locale: Locale) -> &'static str {
    match locale {
        Locale::Russian => "Произошла ошибка. Попробуйте позже.",
        Locale::English => "Something went wrong. Please try again later.",
    }
}
