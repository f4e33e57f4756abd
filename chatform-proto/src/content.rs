//! Outbound prompt content and opaque decorations.

use crate::id::AttachmentKind;
use serde::{Deserialize, Serialize};

/// What a prompt says. Intentionally simple: anything richer than text
/// goes in [`ContentBlock`] variants, not nested Content.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Content {
    /// Plain text content.
    Text(String),
    /// Structured content blocks, sent in order.
    Blocks(Vec<ContentBlock>),
}

/// A single block of structured prompt content.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Plain text block.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
    },

    /// A media item shown alongside the prompt.
    #[serde(rename = "media")]
    Media {
        /// Kind of media (photo, document, ...).
        kind: AttachmentKind,
        /// Platform file id or URL.
        source: String,
        /// Optional caption.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    /// Escape hatch for platform-specific content the core cannot name.
    #[serde(rename = "custom")]
    Custom {
        /// The custom content type identifier.
        content_type: String,
        /// Arbitrary payload.
        data: serde_json::Value,
    },
}

impl Content {
    /// Create a text content value.
    pub fn text(s: impl Into<String>) -> Self {
        Content::Text(s.into())
    }

    /// Extract plain text content, ignoring non-text blocks.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            Content::Blocks(blocks) => blocks.iter().find_map(|b| match b {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::text(s)
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

/// Opaque presentation hints attached to a prompt: reply keyboards,
/// inline buttons, "remove keyboard" markers. Passed through to the
/// [`Transport`](crate::Transport) unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decoration(pub serde_json::Value);

impl Decoration {
    /// Wrap a platform payload.
    pub fn new(payload: serde_json::Value) -> Self {
        Self(payload)
    }

    /// Borrow the payload.
    pub fn payload(&self) -> &serde_json::Value {
        &self.0
    }
}
