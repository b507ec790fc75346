//! Telegram transport.
//!
//! Maps updates to [`BotService`] calls and replies to Telegram messages.
//! The dispatcher hands updates of one chat to the handlers one at a time.

use crate::commands::{self, Command, ScheduleView};
use crate::service::{BotService, Keyboard, Reply};
use crate::texts;
use chrono::Local;
use classmate_core::UserIdentity;
use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove,
    ReplyMarkup, User,
};

/// Buttons per row of a choice keyboard.
const CHOICES_PER_ROW: usize = 3;

/// Update routing: commands, then menu callbacks, then plain text.
pub fn schema() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(Update::filter_message().endpoint(message_handler))
}

/// Runs the long-polling dispatcher until Ctrl-C.
pub async fn run(bot: Bot, service: Arc<BotService>) {
    if let Err(e) = bot.set_my_commands(commands::bot_commands(service.locale())).await {
        tracing::warn!(error = %e, "Failed to register bot commands");
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![service])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

fn identity(user: &User) -> Option<UserIdentity> {
    i64::try_from(user.id.0).ok().map(UserIdentity::new)
}

async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: Arc<BotService>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref().and_then(identity) else {
        return Ok(());
    };

    let reply = match service
        .handle_command(user, cmd, Local::now().date_naive())
        .await
    {
        Ok(reply) => reply,
        Err(report) => {
            tracing::error!(%user, error = %report, "Command failed");
            Reply::text(texts::generic_failure(service.locale()))
        }
    };
    send(&bot, msg.chat.id, reply).await
}

async fn message_handler(
    bot: Bot,
    msg: Message,
    service: Arc<BotService>,
) -> ResponseResult<()> {
    let (Some(user), Some(text)) = (msg.from.as_ref().and_then(identity), msg.text()) else {
        return Ok(());
    };

    let reply = match service.handle_text(user, text) {
        Ok(Some(reply)) => reply,
        Ok(None) => return Ok(()),
        Err(report) => {
            tracing::error!(%user, error = %report, "Schedule entry failed");
            Reply::text(texts::generic_failure(service.locale()))
        }
    };
    send(&bot, msg.chat.id, reply).await
}

async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    service: Arc<BotService>,
) -> ResponseResult<()> {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(view) = q.data.as_deref().and_then(ScheduleView::from_callback_data) else {
        tracing::debug!(data = ?q.data, "Ignoring unknown callback");
        return Ok(());
    };
    let (Some(user), Some(message)) = (identity(&q.from), q.message.as_ref()) else {
        return Ok(());
    };

    let reply = match service.show(user, view, Local::now().date_naive()) {
        Ok(reply) => reply,
        Err(report) => {
            tracing::error!(%user, error = %report, "Schedule view failed");
            Reply::text(texts::generic_failure(service.locale()))
        }
    };
    send(&bot, message.chat().id, reply).await
}

async fn send(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    let request = bot.send_message(chat_id, reply.text);
    match markup(reply.keyboard) {
        Some(markup) => request.reply_markup(markup).await?,
        None => request.await?,
    };
    Ok(())
}

fn markup(keyboard: Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::Choices(choices) => {
            let rows: Vec<Vec<KeyboardButton>> = choices
                .chunks(CHOICES_PER_ROW)
                .map(|row| row.iter().map(KeyboardButton::new).collect())
                .collect();
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(rows)
                    .resize_keyboard()
                    .one_time_keyboard(),
            ))
        }
        Keyboard::Menu(buttons) => {
            let row: Vec<InlineKeyboardButton> = buttons
                .into_iter()
                .map(|(label, view)| InlineKeyboardButton::callback(label, view.callback_data()))
                .collect();
            Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(
                row.chunks(2).map(<[InlineKeyboardButton]>::to_vec),
            )))
        }
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
    }
}
