//! Logging initialization (console + file) and startup diagnostics

use anyhow::Result;
use simplelog::*;
use std::fs::File;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at startup. Secrets are never printed.
pub fn log_startup_configuration(config: &crate::core::config::Config) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🔗 filelink configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("   Database: {}", config.database_path());
    log::info!("   Download URL: {}", config.download_url);
    log::info!("   Download dir: {}", config.download_dir.display());
    log::info!(
        "   Max file size: {}",
        crate::core::utils::humanbytes(config.max_file_size)
    );
    if config.streaming_enabled {
        log::info!(
            "✅ Streaming enabled (max {})",
            crate::core::utils::humanbytes(config.max_stream_size)
        );
    } else {
        log::warn!("⚠️  Streaming disabled, uploads get direct links only");
    }
    match (&config.bot_api_url, config.download_limit()) {
        (Some(url), _) => log::info!("   Bot API: local ({})", url),
        (None, Some(limit)) if limit < config.max_file_size => log::warn!(
            "⚠️  Public Bot API only serves files up to {}; larger uploads will fail to download",
            crate::core::utils::humanbytes(limit)
        ),
        _ => log::info!("   Bot API: https://api.telegram.org"),
    }
    if config.bot_owner == 0 {
        log::warn!("⚠️  BOT_OWNER not set, /stats and /broadcast are unavailable");
    }
    match config.broadcast_max_throttle_retries {
        Some(cap) => log::info!("   Broadcast throttle retries capped at {}", cap),
        None => log::info!("   Broadcast throttle retries unbounded"),
    }
}
