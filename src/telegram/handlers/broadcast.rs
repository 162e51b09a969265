//! /broadcast: copy the replied-to message to every user

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::HandlerError;
use crate::broadcast::telegram::{StatusMessageReporter, TelegramTransport};
use crate::broadcast::BroadcastEngine;
use crate::core::context::AppContext;
use crate::storage::SqliteUserDirectory;
use crate::telegram::texts;

/// Starts a broadcast job in the background and returns immediately.
pub(super) async fn handle_broadcast_command(bot: &Bot, msg: &Message, ctx: &AppContext) -> Result<(), HandlerError> {
    let Some(template) = msg.reply_to_message() else {
        bot.send_message(msg.chat.id, texts::BROADCAST_USAGE_TEXT).await?;
        return Ok(());
    };

    let status = bot.send_message(msg.chat.id, texts::BROADCAST_PREPARING_TEXT).await?;

    let engine = BroadcastEngine::new(
        SqliteUserDirectory::new(ctx.db_pool.clone()),
        TelegramTransport::new(bot.clone(), template.chat.id, template.id),
        StatusMessageReporter::new(bot.clone(), msg.chat.id, status.id),
    )
    .progress_every(ctx.config.broadcast_progress_every)
    .max_throttle_retries(ctx.config.broadcast_max_throttle_retries);

    let bot = bot.clone();
    let chat_id = msg.chat.id;
    tokio::spawn(async move {
        if let Err(e) = engine.run().await {
            log::error!("Broadcast job failed: {}", e);
            if let Err(e) = bot.edit_message_text(chat_id, status.id, texts::BROADCAST_FAILED_TEXT).await {
                log::warn!("Failed to update broadcast status message: {}", e);
            }
        }
    });

    Ok(())
}
