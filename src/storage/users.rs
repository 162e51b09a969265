use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

use crate::broadcast::directory::UserDirectory;
use crate::core::error::AppResult;
use crate::storage::db::{get_connection, DbConnection, DbPool};

/// A bot user, keyed by Telegram id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub join_date: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    /// Uploads stored for this user
    pub file_count: u64,
}

/// Creates the user if it does not exist yet.
///
/// Returns `true` when a new row was inserted.
pub fn add_user(conn: &DbConnection, user_id: i64) -> AppResult<bool> {
    let now = Utc::now();
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO users (id, join_date, last_active, file_count) VALUES (?1, ?2, ?2, 0)",
        params![user_id, now],
    )?;
    if inserted > 0 {
        log::info!("👤 New user {}", user_id);
    }
    Ok(inserted > 0)
}

pub fn is_user_exist(conn: &DbConnection, user_id: i64) -> AppResult<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn get_user(conn: &DbConnection, user_id: i64) -> AppResult<Option<UserRecord>> {
    let user = conn
        .query_row(
            "SELECT id, join_date, last_active, file_count FROM users WHERE id = ?1",
            [user_id],
            |row| {
                Ok(UserRecord {
                    id: row.get(0)?,
                    join_date: row.get(1)?,
                    last_active: row.get(2)?,
                    file_count: row.get::<_, i64>(3)?.max(0) as u64,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn total_users_count(conn: &DbConnection) -> AppResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

/// Snapshot of every user id, in storage order.
pub fn get_all_users(conn: &DbConnection) -> AppResult<Vec<i64>> {
    let mut stmt = conn.prepare("SELECT id FROM users ORDER BY id")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Removes the user. Deleting an unknown id is not an error.
pub fn delete_user(conn: &DbConnection, user_id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM users WHERE id = ?1", [user_id])?;
    Ok(())
}

/// Touches `last_active`. Unknown users are left alone.
pub fn update_user_activity(conn: &DbConnection, user_id: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE users SET last_active = ?1 WHERE id = ?2",
        params![Utc::now(), user_id],
    )?;
    Ok(())
}

/// Creates the user if needed and touches `last_active`.
pub fn ensure_user(conn: &DbConnection, user_id: i64) -> AppResult<()> {
    if !add_user(conn, user_id)? {
        update_user_activity(conn, user_id)?;
    }
    Ok(())
}

/// [`UserDirectory`] backed by the `users` table.
#[derive(Clone)]
pub struct SqliteUserDirectory {
    pool: Arc<DbPool>,
}

impl SqliteUserDirectory {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for SqliteUserDirectory {
    async fn list_all_user_ids(&self) -> AppResult<Vec<i64>> {
        let conn = get_connection(&self.pool)?;
        get_all_users(&conn)
    }

    async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;
        delete_user(&conn, user_id)
    }

    async fn count(&self) -> AppResult<u64> {
        let conn = get_connection(&self.pool)?;
        total_users_count(&conn)
    }
}
