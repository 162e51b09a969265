//! /start, /stats and /ping

use std::time::Instant;

use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};

use super::types::{sender_id, track_user, HandlerError};
use crate::core::context::AppContext;
use crate::storage::files::count_files;
use crate::storage::get_connection;
use crate::storage::users::total_users_count;
use crate::telegram::texts;

pub(super) async fn handle_start_command(bot: &Bot, msg: &Message, ctx: &AppContext) -> Result<(), HandlerError> {
    track_user(ctx, sender_id(msg));

    let mention = msg
        .from
        .as_ref()
        .map(texts::mention)
        .unwrap_or_else(|| "there".to_string());

    bot.send_message(msg.chat.id, texts::start_text(&mention, &ctx.config))
        .parse_mode(ParseMode::Html)
        .reply_markup(texts::start_keyboard(&ctx.config))
        .await?;
    Ok(())
}

pub(super) async fn handle_stats_command(bot: &Bot, msg: &Message, ctx: &AppContext) -> Result<(), HandlerError> {
    let conn = get_connection(&ctx.db_pool)?;
    let total_users = total_users_count(&conn)?;
    let total_files = count_files(&conn)?;

    bot.send_message(msg.chat.id, texts::stats_text(total_users, total_files, &ctx.config))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Replies "Pong" and then edits the reply with the round-trip latency.
pub(super) async fn handle_ping_command(bot: &Bot, msg: &Message) -> Result<(), HandlerError> {
    let started = Instant::now();
    let reply = bot.send_message(msg.chat.id, "🏓 Pong!").await?;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    bot.edit_message_text(msg.chat.id, reply.id, format!("🏓 Pong! <code>{:.2}ms</code>", latency_ms))
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
