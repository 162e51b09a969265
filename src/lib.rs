//! filelink - Telegram bot that turns uploaded files into download and
//! streaming links, with an owner broadcast channel to every user.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, rate limiting, health listener
//! - `storage`: SQLite users / files / streams
//! - `broadcast`: the broadcast delivery engine
//! - `links`, `uploads`: link formatting and upload policy
//! - `telegram`: bot setup and the dispatcher schema

pub mod broadcast;
pub mod cli;
pub mod core;
pub mod links;
pub mod storage;
pub mod telegram;
pub mod uploads;

// Re-export commonly used types for convenience
pub use self::core::{AppContext, AppError, AppResult, Config};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
