//! How prompts reach the chat.

use crate::content::{Content, Decoration};
use crate::error::TransportError;
use crate::id::ChatId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reference to a message the transport sent.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHandle {
    /// Chat the message went to.
    pub chat_id: ChatId,
    /// Platform message id.
    pub message_id: String,
}

impl MessageHandle {
    /// Create a handle.
    pub fn new(chat_id: impl Into<ChatId>, message_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            message_id: message_id.into(),
        }
    }
}

/// Sends outbound messages on behalf of the engine.
///
/// Implemented by the host's platform adapter. The engine treats both
/// operations as fire-and-forget with respect to session state: a failed
/// send is propagated to the caller, never retried.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a field prompt, with its decoration if the field has one.
    async fn send_prompt(
        &self,
        chat: &ChatId,
        content: &Content,
        decoration: Option<&Decoration>,
    ) -> Result<MessageHandle, TransportError>;

    /// Send plain text (used for failure messages).
    async fn send_text(&self, chat: &ChatId, text: &str) -> Result<MessageHandle, TransportError>;
}
