//! SQLite persistence: users, stored files and stream records

pub mod db;
pub mod files;
pub mod migrations;
pub mod streams;
pub mod users;

pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use users::SqliteUserDirectory;
