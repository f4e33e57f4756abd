//! Per-conversation session state.

use crate::id::{ChatId, FormId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one conversation: a user inside a chat.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SessionKey {
    /// The chat.
    pub chat: ChatId,
    /// The user.
    pub user: UserId,
}

impl SessionKey {
    /// Create a key from a chat and a user.
    pub fn new(chat: impl Into<ChatId>, user: impl Into<UserId>) -> Self {
        Self {
            chat: chat.into(),
            user: user.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.chat, self.user)
    }
}

/// Where a form instance is in its field sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum Slot {
    /// Waiting for a reply to the field at this index.
    Awaiting(usize),
    /// Every field accepted; waiting for the host to clear the session.
    Completed,
}

/// The lifecycle phase of a conversation, including the absence of a
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "index", rename_all = "snake_case")]
pub enum Phase {
    /// No active form.
    Idle,
    /// Waiting for the field at this index.
    AwaitingField(usize),
    /// Submitted, session kept because clearing was disabled.
    Completed,
}

impl Phase {
    /// Phase of a conversation given its stored state, if any.
    pub fn of(state: Option<&SessionState>) -> Self {
        match state.map(|s| s.slot) {
            None => Phase::Idle,
            Some(Slot::Awaiting(i)) => Phase::AwaitingField(i),
            Some(Slot::Completed) => Phase::Completed,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::AwaitingField(i) => write!(f, "awaiting field {i}"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

/// One accepted field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedValue {
    /// Field name.
    pub name: String,
    /// The value the field's rule produced.
    pub value: serde_json::Value,
}

/// The mutable record of an active form instance.
///
/// `collected` holds exactly one entry per field before the current slot,
/// in slot order. [`SessionState::accept`] is the only way the engine
/// grows it, so the slot never skips or moves backwards.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Which form is active.
    pub form: FormId,
    /// Current position.
    pub slot: Slot,
    /// Accepted values, in slot order.
    #[serde(default)]
    pub collected: Vec<CollectedValue>,
}

impl SessionState {
    /// Fresh state for a form that was just started.
    pub fn new(form: impl Into<FormId>) -> Self {
        Self {
            form: form.into(),
            slot: Slot::Awaiting(0),
            collected: Vec::new(),
        }
    }

    /// Index of the field being awaited, if not completed.
    pub fn slot_index(&self) -> Option<usize> {
        match self.slot {
            Slot::Awaiting(i) => Some(i),
            Slot::Completed => None,
        }
    }

    /// Whether every field has been accepted.
    pub fn is_completed(&self) -> bool {
        self.slot == Slot::Completed
    }

    /// Look up an accepted value by field name.
    pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
        self.collected
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }

    /// Record the value for the current slot and advance.
    ///
    /// `field_count` is the number of fields in the active form. Returns
    /// the new slot. Calling this on a completed session leaves it
    /// unchanged.
    pub fn accept(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
        field_count: usize,
    ) -> Slot {
        let Slot::Awaiting(index) = self.slot else {
            return self.slot;
        };
        debug_assert_eq!(self.collected.len(), index);
        self.collected.push(CollectedValue {
            name: name.into(),
            value,
        });
        self.slot = if index + 1 >= field_count {
            Slot::Completed
        } else {
            Slot::Awaiting(index + 1)
        };
        self.slot
    }
}
