//! Error types for each boundary.

use thiserror::Error;

/// Session store errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StateError {
    /// A write operation failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Transport errors. Never retried by the engine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform refused or failed the send.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The target chat does not exist or the bot was removed from it.
    #[error("chat not found: {0}")]
    ChatNotFound(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A rule raised instead of answering. Distinct from rejection, which is
/// a normal outcome and never an error.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule failed.
    #[error("rule failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A prompt callback failed to produce content.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PromptError {
    /// The callback failed.
    #[error("prompt failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Completion handler errors. Reported to the host; the session has
/// already advanced by the time these are raised.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler failed.
    #[error("handler failed: {0}")]
    Failed(String),

    /// A context key the binding declared was not supplied by the host.
    #[error("missing context key: {0}")]
    MissingContext(String),

    /// A collected value could not be decoded into the requested type.
    #[error("cannot decode field {field}: {message}")]
    Decode {
        /// Field whose value failed to decode (empty for whole-form decodes).
        field: String,
        /// Decoder message.
        message: String,
    },

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Hook errors. These are logged but never halt the engine.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HookError {
    /// The hook execution failed.
    #[error("hook failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
