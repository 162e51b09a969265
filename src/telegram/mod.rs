//! Telegram bot integration and handlers

pub mod bot;
pub mod handlers;
pub mod texts;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerError};
