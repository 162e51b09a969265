//! Runtime configuration read from environment variables.
//!
//! Everything is loaded once at startup into [`Config`] and shared through
//! [`crate::core::context::AppContext`]; nothing reads the environment after
//! that point.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::core::error::{AppError, AppResult};

/// 4 GiB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 4 * 1024 * 1024 * 1024;
/// 2 GiB
pub const DEFAULT_MAX_STREAM_SIZE: u64 = 2 * 1024 * 1024 * 1024;
/// 1 MiB
pub const DEFAULT_STREAM_CHUNK_SIZE: u64 = 1024 * 1024;
/// 64 KiB
pub const DEFAULT_STREAMING_BUFFER_SIZE: u64 = 64 * 1024;
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_URL: &str = "filelink.sqlite";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://your-domain.com";
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";
pub const DEFAULT_LOG_FILE_PATH: &str = "filelink.log";

/// Broadcast tuning
pub mod broadcast {
    /// Progress is reported every time this many deliveries have succeeded
    pub const PROGRESS_EVERY: usize = 100;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API calls (in seconds).
    /// Large uploads are downloaded through the same client.
    pub const REQUEST_TIMEOUT_SECS: u64 = 900;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// `getFile` on the public Bot API refuses anything larger (20 MB).
    pub const PUBLIC_API_DOWNLOAD_LIMIT: u64 = 20 * 1024 * 1024;
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// MTProto application id. The Bot API client does not need it; it is
    /// kept so existing deployments can share one environment file.
    pub api_id: i32,
    pub api_hash: String,
    pub bot_token: String,
    pub bot_username: String,
    /// Telegram id of the privileged user (`/stats`, `/broadcast`)
    pub bot_owner: i64,
    /// Self-hosted Bot API server. `None` uses api.telegram.org, which only
    /// serves downloads up to [`network::PUBLIC_API_DOWNLOAD_LIMIT`].
    pub bot_api_url: Option<Url>,
    /// SQLite database location. A leading `sqlite://` is stripped.
    pub database_url: String,
    /// Base URL that download / stream links are built from
    pub download_url: Url,
    pub max_file_size: u64,
    pub streaming_enabled: bool,
    pub max_stream_size: u64,
    pub stream_chunk_size: u64,
    pub streaming_buffer_size: u64,
    /// Port for the health-check listener
    pub port: u16,
    /// Where uploaded files are stored after download from Telegram
    pub download_dir: PathBuf,
    pub log_file_path: String,
    pub broadcast_progress_every: usize,
    /// `None` keeps retrying throttled recipients forever
    pub broadcast_max_throttle_retries: Option<u32>,
    /// Optional `/start` keyboard links
    pub updates_channel_url: Option<Url>,
    pub support_group_url: Option<Url>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Numeric values that fail to parse
    /// fall back to their defaults with a warning, except for the values the
    /// bot cannot run without.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN")
            .or_else(|| get("TELOXIDE_TOKEN"))
            .ok_or_else(|| AppError::Config("BOT_TOKEN is not set".to_string()))?;

        let raw_download_url = get("DOWNLOAD_URL").unwrap_or_else(|| DEFAULT_DOWNLOAD_URL.to_string());
        let download_url = Url::parse(raw_download_url.trim_end_matches('/'))
            .map_err(|e| AppError::Config(format!("Invalid DOWNLOAD_URL '{}': {}", raw_download_url, e)))?;

        let bot_owner = match get("BOT_OWNER") {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|e| AppError::Config(format!("Invalid BOT_OWNER '{}': {}", raw, e)))?,
            None => {
                log::warn!("BOT_OWNER is not set; owner-only commands are disabled");
                0
            }
        };

        let bot_api_url = get("BOT_API_URL")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid BOT_API_URL '{}': {}", raw, e)))
            })
            .transpose()?;

        let broadcast_max_throttle_retries = get("BROADCAST_MAX_THROTTLE_RETRIES").and_then(|raw| {
            raw.parse::<u32>()
                .map_err(|e| log::warn!("Ignoring BROADCAST_MAX_THROTTLE_RETRIES='{}': {}", raw, e))
                .ok()
        });

        Ok(Self {
            api_id: parse_or(&get, "API_ID", 0),
            api_hash: get("API_HASH").unwrap_or_default(),
            bot_token,
            bot_username: get("BOT_USERNAME").unwrap_or_default(),
            bot_owner,
            bot_api_url,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            download_url,
            max_file_size: parse_or(&get, "MAX_FILE_SIZE", DEFAULT_MAX_FILE_SIZE),
            streaming_enabled: get("STREAMING_ENABLED").map(|v| parse_flag(&v)).unwrap_or(true),
            max_stream_size: parse_or(&get, "MAX_STREAM_SIZE", DEFAULT_MAX_STREAM_SIZE),
            stream_chunk_size: parse_or(&get, "STREAM_CHUNK_SIZE", DEFAULT_STREAM_CHUNK_SIZE),
            streaming_buffer_size: parse_or(&get, "STREAMING_BUFFER_SIZE", DEFAULT_STREAMING_BUFFER_SIZE),
            port: parse_or(&get, "PORT", DEFAULT_PORT),
            download_dir: PathBuf::from(get("DOWNLOAD_DIR").unwrap_or_else(|| DEFAULT_DOWNLOAD_DIR.to_string())),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            broadcast_progress_every: parse_or(&get, "BROADCAST_PROGRESS_EVERY", broadcast::PROGRESS_EVERY).max(1),
            broadcast_max_throttle_retries,
            updates_channel_url: optional_url(&get, "UPDATES_CHANNEL_URL"),
            support_group_url: optional_url(&get, "SUPPORT_GROUP_URL"),
        })
    }

    /// Filesystem path of the SQLite database.
    pub fn database_path(&self) -> &str {
        self.database_url
            .strip_prefix("sqlite://")
            .unwrap_or(&self.database_url)
    }

    /// Largest file the bot can fetch through `getFile`.
    ///
    /// A local Bot API server has no practical limit, so this is `None` there.
    pub fn download_limit(&self) -> Option<u64> {
        match self.bot_api_url {
            Some(_) => None,
            None => Some(network::PUBLIC_API_DOWNLOAD_LIMIT),
        }
    }

    /// Returns true if `user_id` is the configured owner.
    pub fn is_owner(&self, user_id: i64) -> bool {
        self.bot_owner != 0 && self.bot_owner == user_id
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse::<T>().unwrap_or_else(|e| {
            log::warn!("Invalid {}='{}' ({}), using default", key, raw, e);
            default
        }),
        None => default,
    }
}

fn optional_url<G>(get: &G, key: &str) -> Option<Url>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key)?;
    Url::parse(&raw)
        .map_err(|e| log::warn!("Ignoring {}='{}': {}", key, raw, e))
        .ok()
}

fn parse_flag(raw: &str) -> bool {
    !matches!(raw.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off")
}
