//! Transport that captures every send for assertions.

use crate::content::{Content, Decoration};
use crate::error::TransportError;
use crate::id::ChatId;
use crate::transport::{MessageHandle, Transport};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// One captured outbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    /// A field prompt.
    Prompt {
        /// Target chat.
        chat: ChatId,
        /// Prompt content.
        content: Content,
        /// Decoration passed along, if any.
        decoration: Option<Decoration>,
    },
    /// Plain text (failure messages).
    Text {
        /// Target chat.
        chat: ChatId,
        /// The text.
        text: String,
    },
}

impl SentMessage {
    /// The text of the message: prompt text or plain text.
    pub fn text(&self) -> Option<&str> {
        match self {
            SentMessage::Prompt { content, .. } => content.as_text(),
            SentMessage::Text { text, .. } => Some(text),
        }
    }
}

/// A transport that records sends instead of delivering them.
///
/// Call [`RecordingTransport::fail_sends`] to make every subsequent send
/// fail with [`TransportError::SendFailed`].
pub struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
    failing: AtomicBool,
    next_id: AtomicU64,
}

impl RecordingTransport {
    /// Create a transport with nothing recorded.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Texts of everything sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .iter()
            .filter_map(|m| m.text().map(str::to_owned))
            .collect()
    }

    /// The most recent send.
    pub fn last(&self) -> Option<SentMessage> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    /// Forget recorded sends.
    pub fn clear(&self) {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Toggle failure mode.
    pub fn fail_sends(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, chat: &ChatId, message: SentMessage) -> Result<MessageHandle, TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::SendFailed("transport offline".into()));
        }
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(message);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(MessageHandle::new(chat.clone(), id.to_string()))
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_prompt(
        &self,
        chat: &ChatId,
        content: &Content,
        decoration: Option<&Decoration>,
    ) -> Result<MessageHandle, TransportError> {
        self.record(
            chat,
            SentMessage::Prompt {
                chat: chat.clone(),
                content: content.clone(),
                decoration: decoration.cloned(),
            },
        )
    }

    async fn send_text(&self, chat: &ChatId, text: &str) -> Result<MessageHandle, TransportError> {
        self.record(
            chat,
            SentMessage::Text {
                chat: chat.clone(),
                text: text.to_owned(),
            },
        )
    }
}
