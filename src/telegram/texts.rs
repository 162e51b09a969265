//! User-facing message texts (HTML parse mode) and keyboards.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, User};
use teloxide::utils::html;
use url::Url;

use crate::core::config::Config;
use crate::core::utils::humanbytes;
use crate::links::{share_url, LinkKind};
use crate::uploads::UploadLinks;

pub const CALLBACK_ABOUT: &str = "about";
pub const CALLBACK_HELP: &str = "help";
pub const CALLBACK_HOME: &str = "home";
pub const CALLBACK_CLOSE: &str = "close";

/// Clickable mention of a user.
pub fn mention(user: &User) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user.id.0,
        html::escape(&user.first_name)
    )
}

pub fn start_text(mention: &str, config: &Config) -> String {
    format!(
        "👋 Hello {},\n\n\
         🤖 <b>Welcome to File to Link Bot!</b>\n\n\
         Send me a file and I will turn it into a download link, with streaming for video and audio.\n\n\
         <b>✨ Features:</b>\n\
         ✅ Files up to {}\n\
         ✅ Video &amp; audio streaming\n\
         ✅ Shareable links\n\n\
         <b>📤 Just send me any file!</b>",
        mention,
        humanbytes(config.max_file_size)
    )
}

pub fn about_text(bot_username: &str) -> String {
    format!(
        "🤖 <b>About File to Link Bot</b>\n\n\
         <b>Bot:</b> @{}\n\
         <b>Version:</b> {}\n\n\
         <b>🔧 Features:</b>\n\
         • File to direct link conversion\n\
         • Video &amp; audio streaming links\n\
         • Broadcast messages\n\
         • User management",
        html::escape(bot_username),
        env!("CARGO_PKG_VERSION")
    )
}

pub fn help_text(config: &Config) -> String {
    format!(
        "📖 <b>How to use:</b>\n\n\
         1. Send any file (document, video, audio, photo)\n\
         2. Wait while I fetch it\n\
         3. Get a direct link and streaming options\n\
         4. Share the link with anyone\n\n\
         <b>📁 Limits:</b>\n\
         • Any file up to {}\n\
         • Streaming for video, audio and PDF up to {}\n\n\
         <b>🔧 Commands:</b>\n\
         /start - Start the bot\n\
         /stats - Bot statistics (owner only)\n\
         /broadcast - Broadcast a message (owner only)\n\
         /ping - Check bot latency",
        humanbytes(config.max_file_size),
        humanbytes(config.max_stream_size)
    )
}

pub fn size_exceeded_text(size: u64, max: u64) -> String {
    format!(
        "❌ File size exceeds maximum limit!\n📦 Your file: {}\n⚡ Maximum allowed: {}",
        humanbytes(size),
        humanbytes(max)
    )
}

/// Shown when Telegram refuses to hand over a file the size policy accepted.
pub fn download_too_big_text(size: u64, limit: Option<u64>) -> String {
    match limit {
        Some(limit) => format!(
            "❌ Telegram would not let me download this file.\n📦 Your file: {}\n⚡ The Bot API only serves files up to {}.",
            humanbytes(size),
            humanbytes(limit)
        ),
        None => format!(
            "❌ Telegram would not let me download this file ({}). The Bot API server reported it as too big.",
            humanbytes(size)
        ),
    }
}

pub const DOWNLOADING_TEXT: &str = "📥 Downloading your file...";
pub const GENERATING_TEXT: &str = "🔗 Generating download links...";
pub const UPLOAD_FAILED_TEXT: &str = "❌ Error processing your file. Please try again.";
pub const BROADCAST_PREPARING_TEXT: &str = "📤 Preparing broadcast...";
pub const BROADCAST_FAILED_TEXT: &str = "❌ Broadcast failed: could not read the user list.";
pub const BROADCAST_USAGE_TEXT: &str = "ℹ️ Reply to the message you want to broadcast with /broadcast";

pub fn file_ready_text(file_name: &str, file_size: u64, streamable: bool, links: &UploadLinks) -> String {
    let head = format!(
        "<b>✅ File Ready!</b>\n\n<b>📁 File Name:</b> <code>{}</code>\n<b>📦 File Size:</b> {}\n",
        html::escape(file_name),
        humanbytes(file_size)
    );
    if links.is_streaming() {
        format!(
            "{}<b>🎬 Streamable:</b> {}\n\n<b>Choose an option below:</b>",
            head,
            if streamable { "Yes" } else { "No" }
        )
    } else {
        format!(
            "{}\n<b>🔗 Download Link:</b>\n<code>{}</code>",
            head,
            html::escape(&links.download_link)
        )
    }
}

pub fn stats_text(total_users: u64, total_files: u64, config: &Config) -> String {
    format!(
        "📊 <b>Bot Statistics:</b>\n\n\
         👥 Total Users: {}\n\
         📁 Total Files: {}\n\
         🎬 Streaming: {}\n\
         📦 Max file size: {}",
        total_users,
        total_files,
        if config.streaming_enabled { "enabled" } else { "disabled" },
        humanbytes(config.max_file_size)
    )
}

pub fn start_keyboard(config: &Config) -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    let links: Vec<InlineKeyboardButton> = [
        ("📢 Updates Channel", config.updates_channel_url.as_ref()),
        ("💬 Support Group", config.support_group_url.as_ref()),
    ]
    .into_iter()
    .filter_map(|(label, url)| url.map(|u| InlineKeyboardButton::url(label, u.clone())))
    .collect();
    if !links.is_empty() {
        rows.push(links);
    }
    rows.push(vec![
        InlineKeyboardButton::callback("🤖 About", CALLBACK_ABOUT),
        InlineKeyboardButton::callback("🔧 Help", CALLBACK_HELP),
    ]);
    InlineKeyboardMarkup::new(rows)
}

pub fn back_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("🏠 Home", CALLBACK_HOME),
        InlineKeyboardButton::callback("🔒 Close", CALLBACK_CLOSE),
    ]])
}

/// Buttons under the "File Ready" reply. Links that are not valid URLs are
/// skipped rather than failing the reply.
pub fn file_keyboard(links: &UploadLinks) -> InlineKeyboardMarkup {
    let url_button = |label: &str, link: &str| {
        Url::parse(link)
            .map(|url| InlineKeyboardButton::url(label.to_string(), url))
            .map_err(|e| log::warn!("Skipping button for invalid link {}: {}", link, e))
            .ok()
    };

    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::new();
    if links.is_streaming() {
        for (label, kind) in [
            ("📥 Direct Download", LinkKind::Direct),
            ("🎥 Stream Online", LinkKind::Stream),
            ("👀 Preview", LinkKind::Preview),
        ] {
            if let Some(button) = links.get(kind).and_then(|link| url_button(label, link)) {
                rows.push(vec![button]);
            }
        }
    } else if let Some(button) = url_button("📥 Download", &links.download_link) {
        rows.push(vec![button]);
    }
    if let Some(button) = url_button("🔗 Share", &share_url(&links.download_link)) {
        rows.push(vec![button]);
    }
    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn stream_links() -> UploadLinks {
        UploadLinks {
            download_link: "https://dl.example.com/download/a.mp4".into(),
            stream_links: Some(BTreeMap::from([
                (LinkKind::Direct, "https://dl.example.com/download/a.mp4".to_string()),
                (LinkKind::Stream, "https://dl.example.com/stream/a.mp4".to_string()),
                (LinkKind::Preview, "https://dl.example.com/preview/a.mp4".to_string()),
                (LinkKind::Original, "downloads/a.mp4".to_string()),
            ])),
        }
    }

    #[test]
    fn test_size_exceeded_text() {
        let text = size_exceeded_text(4 * 1024 * 1024 * 1024 + 1, 4 * 1024 * 1024 * 1024);
        assert!(text.contains("Your file: 4.00 GB"));
        assert!(text.contains("Maximum allowed: 4.00 GB"));
    }

    #[test]
    fn test_download_too_big_text() {
        let text = download_too_big_text(100 * 1024 * 1024, Some(20 * 1024 * 1024));
        assert!(text.contains("Your file: 100.00 MB"));
        assert!(text.contains("up to 20.00 MB"));

        let text = download_too_big_text(3 * 1024 * 1024 * 1024, None);
        assert!(text.contains("3.00 GB"));
    }

    #[test]
    fn test_file_keyboard_streaming() {
        let keyboard = file_keyboard(&stream_links());
        // direct, stream, preview, share
        assert_eq!(keyboard.inline_keyboard.len(), 4);
    }

    #[test]
    fn test_file_keyboard_plain() {
        let links = UploadLinks {
            download_link: "https://dl.example.com/files/a.zip".into(),
            stream_links: None,
        };
        assert_eq!(file_keyboard(&links).inline_keyboard.len(), 2);
    }

    #[test]
    fn test_file_ready_text_escapes_name() {
        let text = file_ready_text("<b>.mp4", 10, true, &stream_links());
        assert!(text.contains("&lt;b&gt;.mp4"));
        assert!(text.contains("Streamable:</b> Yes"));
    }
}
