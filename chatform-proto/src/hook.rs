//! Observation of form lifecycle events.

use crate::{error::HookError, id::FormId, session::SessionKey};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where in the form lifecycle a hook fires.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// A form was started for a conversation.
    FormStarted,
    /// A field prompt was sent (first time or re-prompt).
    FieldPrompted,
    /// A reply was accepted and stored.
    FieldAccepted,
    /// A reply was rejected by the field's rule.
    FieldRejected,
    /// The last field was accepted and the submit handler ran.
    FormSubmitted,
    /// Session state was removed (after submit or on cancel).
    SessionCleared,
}

impl HookPoint {
    /// Every hook point, in lifecycle order.
    pub const ALL: [HookPoint; 6] = [
        HookPoint::FormStarted,
        HookPoint::FieldPrompted,
        HookPoint::FieldAccepted,
        HookPoint::FieldRejected,
        HookPoint::FormSubmitted,
        HookPoint::SessionCleared,
    ];
}

/// What a hook sees at its firing point. Read-only.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookContext {
    /// Current hook point.
    pub point: HookPoint,
    /// The conversation.
    pub key: SessionKey,
    /// The active form.
    pub form: FormId,
    /// Field involved (prompt, accept, reject).
    pub field: Option<String>,
    /// Slot index involved (prompt, accept, reject).
    pub slot: Option<usize>,
    /// Accepted value (only at FieldAccepted).
    pub value: Option<serde_json::Value>,
}

impl HookContext {
    /// Create a context with no field information.
    pub fn new(point: HookPoint, key: SessionKey, form: FormId) -> Self {
        Self {
            point,
            key,
            form,
            field: None,
            slot: None,
            value: None,
        }
    }

    /// Attach the field name and slot index.
    pub fn with_field(mut self, field: impl Into<String>, slot: usize) -> Self {
        self.field = Some(field.into());
        self.slot = Some(slot);
        self
    }

    /// Attach an accepted value.
    pub fn with_value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }
}

/// A lifecycle observer.
///
/// Hooks watch; they do not steer. Audit logs, metrics, and analytics
/// ("which field do users abandon?") belong here. A hook error is logged
/// and the engine carries on.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Which points this hook fires at.
    fn points(&self) -> &[HookPoint];

    /// Called at each registered hook point.
    async fn on_event(&self, ctx: &HookContext) -> Result<(), HookError>;
}
