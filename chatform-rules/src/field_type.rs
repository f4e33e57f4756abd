//! Declared value types of form fields.

use chatform_proto::AttachmentKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic type a field's accepted value conforms to.
///
/// Selects the default rule when a field declares none. Rich message
/// types are open-ended: any [`AttachmentKind`] the host registers with
/// the [`CoercionRegistry`](crate::CoercionRegistry) becomes usable.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum FieldType {
    /// Raw message text.
    Text,
    /// Base-10 signed integer.
    Integer,
    /// Decimal floating point.
    Float,
    /// Calendar date.
    Date,
    /// Date and time of day.
    DateTime,
    /// Time of day.
    Time,
    /// The whole inbound message.
    Message,
    /// A rich attachment of the given kind.
    Attachment(AttachmentKind),
}

impl FieldType {
    /// An attachment field of any kind.
    pub fn attachment(kind: impl Into<AttachmentKind>) -> Self {
        FieldType::Attachment(kind.into())
    }

    /// A photo field.
    pub fn photo() -> Self {
        FieldType::Attachment(AttachmentKind::photo())
    }

    /// A document field.
    pub fn document() -> Self {
        FieldType::Attachment(AttachmentKind::document())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Date => write!(f, "date"),
            FieldType::DateTime => write!(f, "datetime"),
            FieldType::Time => write!(f, "time"),
            FieldType::Message => write!(f, "message"),
            FieldType::Attachment(kind) => write!(f, "attachment:{kind}"),
        }
    }
}
