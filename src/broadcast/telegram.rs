//! Bot API implementations of the broadcast seams.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::MessageId;

use crate::broadcast::outcome::{BroadcastTransport, DeliveryOutcome};
use crate::broadcast::progress::{progress_text, started_text, summary_text, BroadcastReport, ProgressReporter};

/// Delivers a broadcast by copying an existing message.
pub struct TelegramTransport {
    bot: Bot,
    from_chat: ChatId,
    message_id: MessageId,
}

impl TelegramTransport {
    pub fn new(bot: Bot, from_chat: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            from_chat,
            message_id,
        }
    }
}

#[async_trait]
impl BroadcastTransport for TelegramTransport {
    async fn copy_to(&self, recipient: i64) -> DeliveryOutcome {
        DeliveryOutcome::from_result(
            self.bot
                .copy_message(ChatId(recipient), self.from_chat, self.message_id)
                .await,
        )
    }
}

/// Edits one status message in the operator's chat.
pub struct StatusMessageReporter {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl StatusMessageReporter {
    pub fn new(bot: Bot, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
        }
    }

    async fn edit(&self, text: String) {
        if let Err(e) = self.bot.edit_message_text(self.chat_id, self.message_id, text).await {
            log::warn!("Failed to update broadcast status message: {}", e);
        }
    }
}

#[async_trait]
impl ProgressReporter for StatusMessageReporter {
    async fn started(&self, total: usize) {
        self.edit(started_text(total)).await;
    }

    async fn progress(&self, delivered: usize, total: usize) {
        self.edit(progress_text(delivered, total)).await;
    }

    async fn finished(&self, report: &BroadcastReport) {
        self.edit(summary_text(report)).await;
    }
}
