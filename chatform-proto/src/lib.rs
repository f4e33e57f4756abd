//! # chatform-proto: protocol types for conversational forms
//!
//! This crate defines the boundaries a form engine talks across. It owns
//! no behavior of its own: the engine lives in `chatform-engine`, stores
//! and hooks live in their own crates.
//!
//! ## The Boundaries
//!
//! | Boundary | Trait / Type | What it does |
//! |----------|--------------|-------------|
//! | ① Inbound | [`Message`] | One unit received from a chat |
//! | ② Transport | [`Transport`] | Sends prompts and plain text to a chat |
//! | ③ Session | [`SessionStore`] | Persists per-conversation [`SessionState`] |
//! | ④ Hooks | [`Hook`], [`HookPoint`] | Observation of form lifecycle events |
//!
//! ## Values
//!
//! Collected field values are `serde_json::Value`. Session state has to
//! round-trip through whatever store the host plugs in, and JSON is the
//! shape every store can hold. Hosts recover typed values at submission
//! time through serde.
//!
//! ## Decorations
//!
//! The core never builds platform markup. A [`Decoration`] is an opaque
//! payload supplied by the form definition and handed to the transport
//! untouched.

#![deny(missing_docs)]

pub mod content;
pub mod context;
pub mod error;
pub mod hook;
pub mod id;
pub mod message;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-exports for convenience
pub use content::{Content, ContentBlock, Decoration};
pub use context::ContextBag;
pub use error::{HandlerError, HookError, PromptError, RuleError, StateError, TransportError};
pub use hook::{Hook, HookContext, HookPoint};
pub use id::{AttachmentKind, ChatId, FormId, UserId};
pub use message::{Attachment, Message};
pub use session::{CollectedValue, Phase, SessionKey, SessionState, Slot};
pub use store::SessionStore;
pub use transport::{MessageHandle, Transport};
