//! Default rules per declared field type.

use crate::field_type::FieldType;
use crate::pattern::Pattern;
use crate::rule::Rule;
use crate::transform;
use chatform_proto::AttachmentKind;
use std::collections::HashMap;

/// Canonical date input format (`31.12.2024`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";
/// Canonical date-time input format (`31.12.2024 18:30`).
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";
/// Canonical time input format (`18:30`).
pub const TIME_FORMAT: &str = "%H:%M";

/// Maps declared field types to the rule used when a field brings none.
///
/// [`CoercionRegistry::new`] installs rules for every built-in type plus
/// photo and document attachments. Other attachment kinds must be
/// registered by the host; a form that uses an unregistered kind fails
/// when it is defined, not when a user replies.
#[derive(Debug, Clone)]
pub struct CoercionRegistry {
    rules: HashMap<FieldType, Rule>,
}

impl CoercionRegistry {
    /// Registry with the built-in defaults.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(FieldType::Text, Pattern::text());
        registry.register(
            FieldType::Integer,
            Pattern::text().apply(transform::integer()),
        );
        registry.register(FieldType::Float, Pattern::text().apply(transform::float()));
        registry.register(
            FieldType::Date,
            Pattern::text().apply(transform::date(DATE_FORMAT)),
        );
        registry.register(
            FieldType::DateTime,
            Pattern::text().apply(transform::datetime(DATETIME_FORMAT)),
        );
        registry.register(
            FieldType::Time,
            Pattern::text().apply(transform::time(TIME_FORMAT)),
        );
        registry.register(FieldType::Message, Pattern::message());
        registry.register(
            FieldType::photo(),
            Pattern::attachment(AttachmentKind::photo()).apply(transform::last()),
        );
        registry.register_attachment(AttachmentKind::document());
        registry
    }

    /// Registry with no rules at all.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Install or replace the default rule for a type. Returns the
    /// rule it replaced.
    pub fn register(&mut self, field_type: FieldType, rule: impl Into<Rule>) -> Option<Rule> {
        self.rules.insert(field_type, rule.into())
    }

    /// Accept any message carrying an attachment of `kind`; the stored
    /// value is the attachment payload.
    pub fn register_attachment(&mut self, kind: impl Into<AttachmentKind>) -> Option<Rule> {
        let kind = kind.into();
        self.register(
            FieldType::Attachment(kind.clone()),
            Pattern::attachment(kind),
        )
    }

    /// The default rule for a type, if one is registered.
    pub fn resolve(&self, field_type: &FieldType) -> Option<Rule> {
        self.rules.get(field_type).cloned()
    }

    /// Whether a default exists for a type.
    pub fn supports(&self, field_type: &FieldType) -> bool {
        self.rules.contains_key(field_type)
    }
}

impl Default for CoercionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
