#![deny(missing_docs)]
//! Form progression engine for chatform.
//!
//! A form is an ordered list of [`Field`]s built with a [`FormBuilder`]
//! and registered in a [`FormRegistry`] together with a
//! [`SubmitBinding`]. The [`FormEngine`] then drives one state machine per
//! conversation:
//!
//! ```text
//! Idle --start--> AwaitingField(0) --accept--> ... --accept--> AwaitingField(N-1)
//!                      |  ^                                          |
//!                      reject (re-prompt)                      accept, submit
//!                                                                     |
//!                                   Idle <--clear-- Completed <-------+
//! ```
//!
//! Rejection never moves the slot. The handler runs once per started form.
//! Messages for one conversation are handled strictly one at a time;
//! different conversations never wait on each other.

pub mod engine;
pub mod error;
pub mod field;
pub mod form;
pub mod handler;
mod locks;
pub mod registry;

pub use engine::{FormEngine, Handled};
pub use error::{DefinitionError, FormError};
pub use field::{Field, Prompt, PromptCallback, PromptRequest};
pub use form::{FieldSlot, FormBuilder, FormDefinition, FormOptions};
pub use handler::{SubmitBinding, SubmitHandler, Submission, handler_fn};
pub use registry::{FormRegistry, RegisteredForm};
