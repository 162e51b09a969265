//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use tempfile::TempDir;

use filelink::storage::{create_pool, get_connection, DbConnection, DbPool};
use filelink::Config;

/// Throwaway SQLite database with migrations applied.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("test.sqlite");
        let pool = create_pool(path.to_str().expect("utf-8 path")).expect("create pool");
        Self {
            pool: Arc::new(pool),
            _dir: dir,
        }
    }

    pub fn conn(&self) -> DbConnection {
        get_connection(&self.pool).expect("connection")
    }
}

/// Config with a test token and `https://dl.example.com` as base URL,
/// plus the given overrides.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("BOT_TOKEN".to_string(), "123456:TEST".to_string()),
        ("BOT_OWNER".to_string(), "1".to_string()),
        ("DOWNLOAD_URL".to_string(), "https://dl.example.com".to_string()),
    ]);
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

/// A private-chat message from `user_id` with the given media payload merged
/// in (e.g. `{"document": {...}}`).
pub fn media_message(user_id: i64, message_id: i32, media: serde_json::Value) -> teloxide::types::Message {
    let mut message = serde_json::json!({
        "message_id": message_id,
        "date": 1700000000,
        "chat": {
            "id": user_id,
            "type": "private",
            "first_name": "Test"
        },
        "from": {
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
            "username": "testuser"
        }
    });
    if let (Some(target), Some(extra)) = (message.as_object_mut(), media.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    serde_json::from_value(message).expect("valid message json")
}
