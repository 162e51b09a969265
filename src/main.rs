use anyhow::Result;
use dotenvy::dotenv;
use serde::Serialize;
use teloxide::prelude::*;

use filelink::cli::{Cli, Commands};
use filelink::core::{health, init_logger, logging::log_startup_configuration, AppContext, Config};
use filelink::storage::{create_pool, get_connection};
use filelink::storage::{files::count_files, users::total_users_count};
use filelink::telegram::{create_bot, schema, setup_bot_commands};

/// Main entry point for the bot
///
/// Parses CLI arguments and dispatches to the subcommand.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    let config = Config::from_env()?;
    init_logger(&config.log_file_path)?;

    match cli.command {
        Some(Commands::Stats { json }) => run_stats(config, json),
        Some(Commands::Run) | None => run_bot(config).await,
    }
}

#[derive(Serialize)]
struct StatsSummary {
    users: u64,
    files: u64,
}

fn run_stats(config: Config, json: bool) -> Result<()> {
    let pool = create_pool(config.database_path())?;
    let conn = get_connection(&pool)?;
    let stats = StatsSummary {
        users: total_users_count(&conn)?,
        files: count_files(&conn)?,
    };

    if json {
        println!("{}", serde_json::to_string(&stats)?);
    } else {
        println!("Users: {}\nFiles: {}", stats.users, stats.files);
    }
    Ok(())
}

async fn run_bot(config: Config) -> Result<()> {
    log::info!("🚀 Starting filelink bot v{}", env!("CARGO_PKG_VERSION"));
    log_startup_configuration(&config);

    tokio::fs::create_dir_all(&config.download_dir).await?;
    let pool = create_pool(config.database_path())?;

    let bot = create_bot(&config)?;
    let me = bot.get_me().await?;
    let username = me.username.clone().unwrap_or_default();
    log::info!("🤖 Logged in as @{}", username);

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let port = config.port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(port).await {
            log::error!("Health server stopped: {}", e);
        }
    });

    let ctx = AppContext::new(config, pool).with_bot_username(&username);

    Dispatcher::builder(bot, schema(ctx))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
