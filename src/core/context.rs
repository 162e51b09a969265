use std::sync::Arc;

use crate::core::config::Config;
use crate::storage::db::DbPool;

/// Shared state built once at startup and handed to every handler and to
/// broadcast jobs.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub db_pool: Arc<DbPool>,
    /// Username reported by `getMe`, falling back to `BOT_USERNAME`
    pub bot_username: Arc<str>,
}

impl AppContext {
    pub fn new(config: Config, db_pool: DbPool) -> Self {
        let bot_username = Arc::from(config.bot_username.as_str());
        Self {
            config: Arc::new(config),
            db_pool: Arc::new(db_pool),
            bot_username,
        }
    }

    /// Replaces the bot username with the one Telegram reports.
    pub fn with_bot_username(mut self, username: &str) -> Self {
        if !username.is_empty() {
            self.bot_username = Arc::from(username);
        }
        self
    }
}
