//! Inline keyboard navigation: about / help / home / close

use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ParseMode};

use super::types::HandlerError;
use crate::core::context::AppContext;
use crate::telegram::texts::{self, CALLBACK_ABOUT, CALLBACK_CLOSE, CALLBACK_HELP, CALLBACK_HOME};

pub(super) async fn handle_callback(bot: &Bot, q: &CallbackQuery, ctx: &AppContext) -> Result<(), HandlerError> {
    let Some((chat_id, message_id)) = q.message.as_ref().map(|m| (m.chat().id, m.id())) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let (text, keyboard) = match q.data.as_deref() {
        Some(CALLBACK_ABOUT) => (texts::about_text(&ctx.bot_username), texts::back_keyboard()),
        Some(CALLBACK_HELP) => (texts::help_text(&ctx.config), texts::back_keyboard()),
        Some(CALLBACK_HOME) => (
            texts::start_text(&texts::mention(&q.from), &ctx.config),
            texts::start_keyboard(&ctx.config),
        ),
        Some(CALLBACK_CLOSE) => {
            bot.answer_callback_query(q.id.clone()).await?;
            bot.delete_message(chat_id, message_id).await?;
            return Ok(());
        }
        other => {
            log::debug!("Ignoring unknown callback data {:?}", other);
            bot.answer_callback_query(q.id.clone()).await?;
            return Ok(());
        }
    };

    bot.answer_callback_query(q.id.clone()).await?;
    bot.edit_message_text(chat_id, message_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}
