//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use super::broadcast::handle_broadcast_command;
use super::callbacks::handle_callback;
use super::commands::{handle_ping_command, handle_start_command, handle_stats_command};
use super::types::{sender_id, track_user, HandlerError};
use super::uploads::media_upload_handler;
use crate::core::context::AppContext;
use crate::telegram::bot::Command;

/// Creates the dispatcher schema for the bot.
///
/// Production and integration tests use the same tree.
pub fn schema(ctx: AppContext) -> UpdateHandler<HandlerError> {
    let ctx_commands = ctx.clone();
    let ctx_uploads = ctx.clone();
    let ctx_callback = ctx;

    dptree::entry()
        .branch(command_handler(ctx_commands))
        .branch(media_upload_handler(ctx_uploads))
        .branch(callback_handler(ctx_callback))
}

fn command_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let ctx = ctx.clone();
            async move {
                let user_id = sender_id(&msg);
                log::info!("🎯 Received command: {:?} from user {}", cmd, user_id);

                match cmd {
                    Command::Start => {
                        if msg.chat.is_private() {
                            handle_start_command(&bot, &msg, &ctx).await?;
                        }
                    }
                    Command::Ping => {
                        track_user(&ctx, user_id);
                        handle_ping_command(&bot, &msg).await?;
                    }
                    Command::Stats | Command::Broadcast if !ctx.config.is_owner(user_id) => {
                        log::warn!("Ignoring owner-only {:?} from user {}", cmd, user_id);
                    }
                    Command::Stats => {
                        handle_stats_command(&bot, &msg, &ctx).await?;
                    }
                    Command::Broadcast => {
                        handle_broadcast_command(&bot, &msg, &ctx).await?;
                    }
                }
                Ok(())
            }
        },
    ))
}

fn callback_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let ctx = ctx.clone();
        async move { handle_callback(&bot, &q, &ctx).await }
    })
}
