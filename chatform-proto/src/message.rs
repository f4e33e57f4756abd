//! Inbound messages as the engine sees them.

use crate::id::{AttachmentKind, ChatId, UserId};
use crate::session::SessionKey;
use serde::{Deserialize, Serialize};

/// One inbound unit from the chat platform.
///
/// Carries just enough for rule evaluation: who sent it, optional text
/// and caption, and whatever rich attachments came along. Platform
/// adapters fill attachment payloads with their own JSON shape; the
/// engine only looks at the kind.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Chat the message arrived in.
    pub chat_id: ChatId,
    /// User who sent it.
    pub user_id: UserId,
    /// Message text, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Caption attached to media, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Rich attachments, in the order the platform delivered them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Create an empty message from a sender.
    pub fn new(chat_id: impl Into<ChatId>, user_id: impl Into<UserId>) -> Self {
        Self {
            chat_id: chat_id.into(),
            user_id: user_id.into(),
            text: None,
            caption: None,
            attachments: Vec::new(),
        }
    }

    /// Create a plain text message.
    pub fn text(
        chat_id: impl Into<ChatId>,
        user_id: impl Into<UserId>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(chat_id, user_id).with_text(text)
    }

    /// Set the message text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the media caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Append an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The first attachment of the given kind, if present.
    pub fn attachment(&self, kind: &AttachmentKind) -> Option<&Attachment> {
        self.attachments.iter().find(|a| &a.kind == kind)
    }

    /// The conversation this message belongs to.
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.chat_id.clone(), self.user_id.clone())
    }
}

/// A rich attachment marker.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// What kind of attachment this is.
    pub kind: AttachmentKind,
    /// Platform-specific description (file ids, sizes, mime type, ...).
    pub payload: serde_json::Value,
}

impl Attachment {
    /// Create an attachment of any kind.
    ///
    /// A null or `false` payload is stored as an empty object: rules read
    /// either as "no match", and an attachment that is present must never
    /// look absent.
    pub fn new(kind: impl Into<AttachmentKind>, payload: serde_json::Value) -> Self {
        let payload = match payload {
            serde_json::Value::Null | serde_json::Value::Bool(false) => {
                serde_json::Value::Object(serde_json::Map::new())
            }
            other => other,
        };
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// A photo attachment. Platforms usually send one entry per size,
    /// smallest first.
    pub fn photo(sizes: serde_json::Value) -> Self {
        Self::new(AttachmentKind::photo(), sizes)
    }

    /// A document attachment.
    pub fn document(payload: serde_json::Value) -> Self {
        Self::new(AttachmentKind::document(), payload)
    }
}
