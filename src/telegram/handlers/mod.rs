//! Telegram handler tree
//!
//! Integration tests can build the same tree as production through
//! [`schema`].

mod broadcast;
mod callbacks;
mod commands;
mod schema;
mod types;
mod uploads;

pub use schema::schema;
pub use types::{sender_id, HandlerError};
pub use uploads::incoming_file;
