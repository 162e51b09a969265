use async_trait::async_trait;
use std::time::Duration;
use teloxide::{ApiError, RequestError};

/// Result of one attempt to deliver the template message to a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// Telegram asked us to slow down; retry the same recipient after the wait
    Throttled(Duration),
    /// The recipient blocked the bot or deleted their account
    Unreachable,
    /// Any other error; the recipient is skipped
    Failed(String),
}

impl DeliveryOutcome {
    /// Maps a Bot API error onto the broadcast state machine.
    pub fn from_error(err: &RequestError) -> Self {
        match err {
            RequestError::RetryAfter(seconds) => Self::Throttled(seconds.duration()),
            RequestError::Api(ApiError::BotBlocked | ApiError::UserDeactivated) => Self::Unreachable,
            other => Self::Failed(other.to_string()),
        }
    }

    pub fn from_result<T>(result: Result<T, RequestError>) -> Self {
        match result {
            Ok(_) => Self::Delivered,
            Err(err) => Self::from_error(&err),
        }
    }
}

/// Copies the broadcast template to one recipient.
#[async_trait]
pub trait BroadcastTransport: Send + Sync {
    async fn copy_to(&self, recipient: i64) -> DeliveryOutcome;
}
