use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::core::error::AppResult;
use crate::links::LinkKind;
use crate::storage::db::DbConnection;

/// Default page size for [`get_user_files`].
pub const USER_FILES_LIMIT: usize = 50;

/// Metadata of one stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Telegram file id
    pub file_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub download_link: String,
    /// Present only for streamable uploads
    pub stream_links: Option<BTreeMap<LinkKind, String>>,
    pub user_id: i64,
    pub upload_date: DateTime<Utc>,
    pub download_count: u64,
}

fn encode_links(links: &Option<BTreeMap<LinkKind, String>>) -> AppResult<Option<String>> {
    links
        .as_ref()
        .map(|links| {
            let named: BTreeMap<&str, &str> = links.iter().map(|(k, v)| (k.as_ref(), v.as_str())).collect();
            serde_json::to_string(&named)
        })
        .transpose()
        .map_err(Into::into)
}

fn decode_links(raw: Option<String>) -> Option<BTreeMap<LinkKind, String>> {
    let raw = raw?;
    match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
        Ok(named) => Some(
            named
                .into_iter()
                .filter_map(|(k, v)| LinkKind::from_str(&k).ok().map(|kind| (kind, v)))
                .collect(),
        ),
        Err(e) => {
            log::warn!("Ignoring malformed stream_links column: {}", e);
            None
        }
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        file_id: row.get(0)?,
        file_name: row.get(1)?,
        file_size: row.get::<_, i64>(2)?.max(0) as u64,
        download_link: row.get(3)?,
        stream_links: decode_links(row.get(4)?),
        user_id: row.get(5)?,
        upload_date: row.get(6)?,
        download_count: row.get::<_, i64>(7)?.max(0) as u64,
    })
}

const SELECT_FILE: &str = "SELECT file_id, file_name, file_size, download_link, stream_links, user_id, upload_date, download_count FROM files";

/// Stores the upload and bumps the owner's `file_count` in one transaction.
///
/// Re-uploading the same Telegram file refreshes its metadata and keeps the
/// download counter.
pub fn add_file_record(conn: &DbConnection, record: &FileRecord) -> AppResult<()> {
    let stream_links = encode_links(&record.stream_links)?;
    let file_size = i64::try_from(record.file_size).unwrap_or(i64::MAX);

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO files (file_id, file_name, file_size, download_link, stream_links, user_id, upload_date, download_count)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(file_id) DO UPDATE SET
            file_name = excluded.file_name,
            file_size = excluded.file_size,
            download_link = excluded.download_link,
            stream_links = excluded.stream_links,
            user_id = excluded.user_id,
            upload_date = excluded.upload_date",
        params![
            record.file_id,
            record.file_name,
            file_size,
            record.download_link,
            stream_links,
            record.user_id,
            record.upload_date,
            record.download_count as i64,
        ],
    )?;
    tx.execute(
        "UPDATE users SET file_count = file_count + 1 WHERE id = ?1",
        [record.user_id],
    )?;
    tx.commit()?;

    log::info!(
        "💾 Stored file {} ({}) for user {}",
        record.file_name,
        record.file_id,
        record.user_id
    );
    Ok(())
}

pub fn get_file(conn: &DbConnection, file_id: &str) -> AppResult<Option<FileRecord>> {
    let record = conn
        .query_row(&format!("{} WHERE file_id = ?1", SELECT_FILE), [file_id], record_from_row)
        .optional()?;
    Ok(record)
}

/// Returns `false` when the file is unknown.
pub fn increment_download_count(conn: &DbConnection, file_id: &str) -> AppResult<bool> {
    let updated = conn.execute(
        "UPDATE files SET download_count = download_count + 1 WHERE file_id = ?1",
        [file_id],
    )?;
    Ok(updated > 0)
}

/// Most recent uploads of a user, newest first.
pub fn get_user_files(conn: &DbConnection, user_id: i64, limit: usize) -> AppResult<Vec<FileRecord>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE user_id = ?1 ORDER BY upload_date DESC LIMIT ?2",
        SELECT_FILE
    ))?;
    let files = stmt
        .query_map(params![user_id, limit as i64], record_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(files)
}

pub fn count_files(conn: &DbConnection) -> AppResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}
