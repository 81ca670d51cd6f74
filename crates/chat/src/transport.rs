//! The outbound chat seam.

use async_trait::async_trait;
use kino_core::inbound::Command;
use kino_core::outgoing::{Menu, Outgoing};
use kino_core::types::{ChatId, MessageId};

/// Errors from the chat transport.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform rejected the call.
    #[error("Chat API error ({code}): {description}")]
    ApiError { code: i64, description: String },

    /// The body was not the envelope the platform promises.
    #[error("Malformed chat API response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Everything the bot does to a chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Deliver a message and return its id.
    async fn send(&self, chat_id: ChatId, message: &Outgoing) -> Result<MessageId, ChatError>;

    /// Replace the text of a sent message. `menu: None` removes its buttons.
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        menu: Option<&Menu>,
    ) -> Result<(), ChatError>;

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), ChatError>;

    /// Acknowledge a button press, optionally with a short notice.
    async fn answer_callback(&self, callback_id: &str, notice: Option<&str>)
        -> Result<(), ChatError>;

    /// Publish the command list shown in the chat client's menu.
    async fn set_commands(&self, commands: &[Command]) -> Result<(), ChatError>;
}
