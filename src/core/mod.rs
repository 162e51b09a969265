//! Configuration, errors, logging and shared helpers

pub mod config;
pub mod context;
pub mod error;
pub mod health;
pub mod logging;
pub mod media;
pub mod rate_limiter;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use context::AppContext;
pub use error::{AppError, AppResult};
pub use logging::init_logger;
