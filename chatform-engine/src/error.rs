//! Definition-time and runtime errors of the engine.

use chatform_proto::{
    FormId, HandlerError, Phase, PromptError, RuleError, SessionKey, StateError, TransportError,
};
use chatform_rules::FieldType;
use thiserror::Error;

/// A form could not be defined or registered. Raised before any
/// conversation uses the form.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The form declares no fields.
    #[error("form {form} has no fields")]
    EmptyForm {
        /// The form.
        form: FormId,
    },

    /// A field name is empty or whitespace.
    #[error("form {form}: field at slot {slot} has an empty name")]
    EmptyFieldName {
        /// The form.
        form: FormId,
        /// Slot of the offending field.
        slot: usize,
    },

    /// Two fields share a name.
    #[error("form {form}: duplicate field name {field:?}")]
    DuplicateField {
        /// The form.
        form: FormId,
        /// The repeated name.
        field: String,
    },

    /// A field brings no rule and its type has no registered default.
    #[error("form {form}: field {field:?} has type {field_type} with no rule and no default")]
    UnsupportedType {
        /// The form.
        form: FormId,
        /// The field.
        field: String,
        /// Its declared type.
        field_type: FieldType,
    },

    /// A form with this id is already registered.
    #[error("form {0} is already registered")]
    DuplicateForm(FormId),
}

/// Errors surfaced by [`FormEngine`](crate::FormEngine) operations.
///
/// A rejected reply is not an error; see
/// [`Handled::Rejected`](crate::Handled::Rejected).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FormError {
    /// `start` on a conversation that already has a session.
    #[error("conversation {key} already has an active form ({phase})")]
    AlreadyActive {
        /// The conversation.
        key: SessionKey,
        /// Its phase at the time of the call.
        phase: Phase,
    },

    /// An engine call for a conversation was made from inside a rule,
    /// prompt, hook or handler already running for that conversation.
    #[error("conversation {key} is already being handled by this task")]
    Reentered {
        /// The conversation.
        key: SessionKey,
    },

    /// No form with this id is registered.
    #[error("unknown form: {0}")]
    UnknownForm(FormId),

    /// Stored session state does not fit the form it names.
    #[error("session {key} does not fit form {form}: {reason}")]
    CorruptSession {
        /// The conversation.
        key: SessionKey,
        /// The form the session names.
        form: FormId,
        /// What is wrong with it.
        reason: String,
    },

    /// A field's rule raised instead of answering.
    #[error("rule for field {field:?} failed: {source}")]
    Rule {
        /// The field being validated.
        field: String,
        /// The rule's error.
        source: RuleError,
    },

    /// A prompt callback raised.
    #[error("prompt for field {field:?} failed: {source}")]
    Prompt {
        /// The field being prompted.
        field: String,
        /// The callback's error.
        source: PromptError,
    },

    /// Sending a prompt or failure text failed. Not retried.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session store failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// The completion handler failed. The session was not rolled back.
    #[error("submit handler error: {0}")]
    Handler(#[from] HandlerError),
}
