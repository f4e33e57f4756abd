//! Typed ID wrappers for chats, users, forms, and attachment kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a string-backed id newtype.
///
/// Chat platforms hand out ids in whatever shape suits them: Telegram
/// chat ids are signed integers (negative for groups), other platforms use
/// UUIDs or opaque handles. Every id is kept as the platform's string
/// rendering so a session written by one adapter can be read back by
/// another, and integer ids convert directly via `From<i64>`.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a platform id.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The id as the platform rendered it.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        // Platform numeric ids, e.g. a group chat's `-100123456`.
        impl From<i64> for $name {
            fn from(n: i64) -> Self {
                Self(n.to_string())
            }
        }
    };
}

typed_id!(
    ChatId,
    "The chat a message arrived in: a private dialog, a group or a channel."
);
typed_id!(
    UserId,
    "The user who sent a message. Together with a [`ChatId`] it keys one conversation."
);
typed_id!(FormId, "Unique identifier of a registered form definition.");
typed_id!(
    AttachmentKind,
    "Kind of rich attachment a message carries (photo, document, voice, ...)."
);

impl AttachmentKind {
    /// Kind name used for photos.
    pub const PHOTO: &'static str = "photo";
    /// Kind name used for documents.
    pub const DOCUMENT: &'static str = "document";

    /// The photo attachment kind.
    pub fn photo() -> Self {
        Self::new(Self::PHOTO)
    }

    /// The document attachment kind.
    pub fn document() -> Self {
        Self::new(Self::DOCUMENT)
    }
}
