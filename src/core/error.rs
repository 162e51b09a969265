use thiserror::Error;

/// Centralized error type for the bot.
///
/// Storage, Telegram and I/O failures are converted into this enum so that
/// handlers and the broadcast engine can propagate them with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Telegram file download errors
    #[error("Telegram download error: {0}")]
    TelegramDownload(#[from] teloxide::DownloadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Schema migration failures
    #[error("Migration error: {0}")]
    Migration(String),

    /// ffprobe / ffmpeg failures
    #[error("Media tool error: {0}")]
    Media(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Uploaded file is bigger than `MAX_FILE_SIZE`
    #[error("File size {size} exceeds the maximum of {max} bytes")]
    UploadTooLarge { size: u64, max: u64 },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
