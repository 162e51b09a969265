//! File upload handler: private-chat documents, videos, audio and photos

use std::path::Path;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, Message, ParseMode, ReplyParameters};

use super::types::{sender_id, track_user, HandlerError};
use crate::core::context::AppContext;
use crate::core::error::{AppError, AppResult};
use crate::storage::get_connection;
use crate::telegram::texts;
use crate::uploads::{register_upload, stored_path, validate_upload, IncomingFile, MediaKind};

/// Extracts the uploaded file from a message, if it carries one.
///
/// For photos the largest size is used.
pub fn incoming_file(msg: &Message) -> Option<IncomingFile> {
    let fallback_name = || IncomingFile::fallback_name(msg.id.0);

    if let Some(doc) = msg.document() {
        Some(IncomingFile {
            file_id: doc.file.id.0.clone(),
            unique_id: doc.file.unique_id.0.clone(),
            file_name: doc.file_name.clone().unwrap_or_else(fallback_name),
            file_size: u64::from(doc.file.size),
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
            kind: MediaKind::Document,
        })
    } else if let Some(video) = msg.video() {
        Some(IncomingFile {
            file_id: video.file.id.0.clone(),
            unique_id: video.file.unique_id.0.clone(),
            file_name: video.file_name.clone().unwrap_or_else(fallback_name),
            file_size: u64::from(video.file.size),
            mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
            kind: MediaKind::Video,
        })
    } else if let Some(audio) = msg.audio() {
        Some(IncomingFile {
            file_id: audio.file.id.0.clone(),
            unique_id: audio.file.unique_id.0.clone(),
            file_name: audio.file_name.clone().unwrap_or_else(fallback_name),
            file_size: u64::from(audio.file.size),
            mime_type: audio.mime_type.as_ref().map(|m| m.to_string()),
            kind: MediaKind::Audio,
        })
    } else {
        let photo = msg.photo()?.iter().max_by_key(|p| p.width * p.height)?;
        Some(IncomingFile {
            file_id: photo.file.id.0.clone(),
            unique_id: photo.file.unique_id.0.clone(),
            file_name: fallback_name(),
            file_size: u64::from(photo.file.size),
            mime_type: None,
            kind: MediaKind::Photo,
        })
    }
}

pub(super) fn media_upload_handler(ctx: AppContext) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .filter_map(|msg: Message| incoming_file(&msg))
        .endpoint(move |bot: Bot, msg: Message, file: IncomingFile| {
            let ctx = ctx.clone();
            async move {
                let user_id = sender_id(&msg);
                track_user(&ctx, user_id);
                log::info!(
                    "📤 Upload from {}: {} ({}, {} bytes)",
                    user_id,
                    file.file_name,
                    file.kind,
                    file.file_size
                );

                match validate_upload(&ctx.config, &file) {
                    Ok(()) => {}
                    Err(AppError::UploadTooLarge { size, max }) => {
                        log::info!("Rejected {} from {}: {} > {}", file.file_name, user_id, size, max);
                        bot.send_message(msg.chat.id, texts::size_exceeded_text(size, max))
                            .reply_parameters(ReplyParameters::new(msg.id))
                            .await?;
                        return Ok(());
                    }
                    Err(e) => {
                        log::warn!("Rejected {} from {}: {}", file.file_name, user_id, e);
                        bot.send_message(msg.chat.id, texts::UPLOAD_FAILED_TEXT).await?;
                        return Ok(());
                    }
                }

                if let Err(e) = process_upload(&bot, &msg, &ctx, user_id, &file).await {
                    let reply = if is_file_too_big_error(&e) {
                        log::warn!("Bot API refused to serve {} ({} bytes): {}", file.file_name, file.file_size, e);
                        texts::download_too_big_text(file.file_size, ctx.config.download_limit())
                    } else {
                        log::error!("File handling error for {}: {}", file.file_name, e);
                        texts::UPLOAD_FAILED_TEXT.to_string()
                    };
                    bot.send_message(msg.chat.id, reply).await?;
                }
                Ok(())
            }
        })
}

/// Download, link generation, persistence and the final reply.
async fn process_upload(
    bot: &Bot,
    msg: &Message,
    ctx: &AppContext,
    user_id: i64,
    file: &IncomingFile,
) -> AppResult<()> {
    let status = bot
        .send_message(msg.chat.id, texts::DOWNLOADING_TEXT)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    let path = stored_path(&ctx.config.download_dir, file);
    download_to(bot, &file.file_id, &path).await?;

    bot.edit_message_text(msg.chat.id, status.id, texts::GENERATING_TEXT)
        .await?;

    let registered = get_connection(&ctx.db_pool)
        .and_then(|conn| register_upload(&conn, &ctx.config, user_id, file, &path));
    let (record, links) = match registered {
        Ok(stored) => stored,
        Err(e) => {
            discard_download(&path).await;
            return Err(e);
        }
    };

    bot.edit_message_text(
        msg.chat.id,
        status.id,
        texts::file_ready_text(&record.file_name, record.file_size, file.is_streamable(), &links),
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(texts::file_keyboard(&links))
    .await?;

    log::info!("✅ Links ready for {} ({})", record.file_name, record.download_link);
    Ok(())
}

async fn download_to(bot: &Bot, file_id: &str, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tg_file = bot.get_file(FileId(file_id.to_string())).await?;
    let mut dst = tokio::fs::File::create(path).await?;
    if let Err(e) = bot.download_file(&tg_file.path, &mut dst).await {
        drop(dst);
        discard_download(path).await;
        return Err(e.into());
    }
    Ok(())
}

/// Removes a stored file after a failed upload. Failures are only logged.
async fn discard_download(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::warn!("Failed to remove {} after error: {}", path.display(), e);
    }
}

/// `getFile` answers "file is too big" for anything over the server's limit.
fn is_file_too_big_error(e: &AppError) -> bool {
    match e {
        AppError::Telegram(req) => req.to_string().to_lowercase().contains("file is too big"),
        _ => false,
    }
}
