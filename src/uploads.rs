//! Upload policy: size limit, streamability, stored path and link choice.
//!
//! The Telegram handler extracts an [`IncomingFile`] from the message and
//! drives the steps here; nothing in this module talks to Telegram.

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::error::{AppError, AppResult};
use crate::core::media::{guess_mime_type, is_streamable_mime};
use crate::core::utils::escape_filename;
use crate::links::{direct_file_link, generate_stream_links, LinkKind};
use crate::storage::db::DbConnection;
use crate::storage::files::{add_file_record, FileRecord};
use crate::storage::streams::{add_stream_record, ORIGINAL_QUALITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Document,
    Video,
    Audio,
    Photo,
}

/// A file a user sent to the bot.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub file_id: String,
    /// Stable across bots; used for the on-disk name
    pub unique_id: String,
    pub file_name: String,
    pub file_size: u64,
    /// MIME type declared by the client, if any
    pub mime_type: Option<String>,
    pub kind: MediaKind,
}

impl IncomingFile {
    /// Name to use when the client did not send one.
    pub fn fallback_name(message_id: i32) -> String {
        format!("file_{}", message_id)
    }

    /// Video and audio are always streamable, photos never. Documents are
    /// streamable when their MIME type (declared, else guessed from the name)
    /// mentions video, audio or pdf.
    pub fn is_streamable(&self) -> bool {
        match self.kind {
            MediaKind::Video | MediaKind::Audio => true,
            MediaKind::Photo => false,
            MediaKind::Document => {
                let mime = self
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| guess_mime_type(&self.file_name));
                is_streamable_mime(&mime)
            }
        }
    }
}

/// Rejects files strictly larger than `max`.
pub fn check_size(size: u64, max: u64) -> AppResult<()> {
    if size > max {
        return Err(AppError::UploadTooLarge { size, max });
    }
    Ok(())
}

/// Checks that must pass before anything is downloaded or stored.
pub fn validate_upload(config: &Config, file: &IncomingFile) -> AppResult<()> {
    check_size(file.file_size, config.max_file_size)?;
    if file.file_size == 0 {
        return Err(AppError::Validation(format!("{} is empty", file.file_name)));
    }
    Ok(())
}

/// Where the upload is written: `<download_dir>/<unique_id>-<escaped name>`.
pub fn stored_path(download_dir: &Path, file: &IncomingFile) -> PathBuf {
    download_dir.join(format!("{}-{}", file.unique_id, escape_filename(&file.file_name)))
}

/// Links chosen for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLinks {
    pub download_link: String,
    pub stream_links: Option<BTreeMap<LinkKind, String>>,
}

impl UploadLinks {
    pub fn is_streaming(&self) -> bool {
        self.stream_links.is_some()
    }

    pub fn get(&self, kind: LinkKind) -> Option<&str> {
        self.stream_links
            .as_ref()
            .and_then(|links| links.get(&kind))
            .map(String::as_str)
    }
}

/// Picks stream links for streamable files within `MAX_STREAM_SIZE` when
/// streaming is enabled, a plain `/files/` link otherwise.
pub fn choose_links(config: &Config, file: &IncomingFile, stored_path: &Path) -> UploadLinks {
    let stream = config.streaming_enabled && file.is_streamable() && file.file_size <= config.max_stream_size;

    if stream {
        let links = generate_stream_links(stored_path, &config.download_url);
        let download_link = links
            .get(&LinkKind::Direct)
            .cloned()
            .unwrap_or_else(|| direct_file_link(stored_path, &config.download_url));
        UploadLinks {
            download_link,
            stream_links: Some(links),
        }
    } else {
        UploadLinks {
            download_link: direct_file_link(stored_path, &config.download_url),
            stream_links: None,
        }
    }
}

/// Persists a downloaded upload and returns the stored record.
///
/// Streamed uploads also get a stream record for their `stream` link.
pub fn register_upload(
    conn: &DbConnection,
    config: &Config,
    user_id: i64,
    file: &IncomingFile,
    stored_path: &Path,
) -> AppResult<(FileRecord, UploadLinks)> {
    validate_upload(config, file)?;

    let links = choose_links(config, file, stored_path);
    let record = FileRecord {
        file_id: file.file_id.clone(),
        file_name: file.file_name.clone(),
        file_size: file.file_size,
        download_link: links.download_link.clone(),
        stream_links: links.stream_links.clone(),
        user_id,
        upload_date: Utc::now(),
        download_count: 0,
    };
    add_file_record(conn, &record)?;

    if let Some(stream_url) = links.get(LinkKind::Stream) {
        add_stream_record(conn, &file.file_id, stream_url, ORIGINAL_QUALITY)?;
    }

    Ok((record, links))
}
