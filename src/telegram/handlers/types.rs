//! Handler error type and small helpers shared by handlers

use teloxide::types::Message;

use crate::core::context::AppContext;
use crate::storage::get_connection;
use crate::storage::users::ensure_user;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Telegram id of the message sender, `0` if unknown.
pub fn sender_id(msg: &Message) -> i64 {
    msg.from.as_ref().and_then(|u| i64::try_from(u.id.0).ok()).unwrap_or(0)
}

/// Registers the user on first contact and touches `last_active`.
///
/// Storage errors are logged; a user interaction never fails because of them.
pub fn track_user(ctx: &AppContext, user_id: i64) {
    if user_id == 0 {
        return;
    }
    let result = get_connection(&ctx.db_pool).and_then(|conn| ensure_user(&conn, user_id));
    if let Err(e) = result {
        log::error!("Failed to record activity of user {}: {}", user_id, e);
    }
}
