use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::core::error::AppResult;
use crate::storage::db::DbConnection;

/// Quality label used for links that point at the uploaded file as-is.
pub const ORIGINAL_QUALITY: &str = "original";

/// A streaming endpoint registered for a stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub id: i64,
    pub file_id: String,
    pub stream_url: String,
    pub quality: String,
    pub created_at: DateTime<Utc>,
    pub view_count: u64,
}

/// Registers a stream link and returns its row id.
///
/// One row per `(file_id, quality)`: registering again replaces the URL and
/// keeps the view counter.
pub fn add_stream_record(conn: &DbConnection, file_id: &str, stream_url: &str, quality: &str) -> AppResult<i64> {
    let id = conn.query_row(
        "INSERT INTO streams (file_id, stream_url, quality, created_at, view_count)
         VALUES (?1, ?2, ?3, ?4, 0)
         ON CONFLICT(file_id, quality) DO UPDATE SET stream_url = excluded.stream_url
         RETURNING id",
        params![file_id, stream_url, quality, Utc::now()],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Bumps the view counter of every stream registered for `file_id`.
///
/// Returns the number of stream rows touched.
pub fn increment_stream_views(conn: &DbConnection, file_id: &str) -> AppResult<usize> {
    let updated = conn.execute(
        "UPDATE streams SET view_count = view_count + 1 WHERE file_id = ?1",
        [file_id],
    )?;
    Ok(updated)
}

pub fn get_streams_for_file(conn: &DbConnection, file_id: &str) -> AppResult<Vec<StreamRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, file_id, stream_url, quality, created_at, view_count FROM streams WHERE file_id = ?1 ORDER BY id",
    )?;
    let streams = stmt
        .query_map([file_id], |row| {
            Ok(StreamRecord {
                id: row.get(0)?,
                file_id: row.get(1)?,
                stream_url: row.get(2)?,
                quality: row.get(3)?,
                created_at: row.get(4)?,
                view_count: row.get::<_, i64>(5)?.max(0) as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(streams)
}
