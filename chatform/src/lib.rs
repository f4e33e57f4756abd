#![deny(missing_docs)]
//! # chatform
//!
//! Single import surface for building conversational forms. Re-exports
//! the protocol, rules, engine and store crates behind feature flags,
//! plus a `prelude` for the happy path:
//!
//! ```ignore
//! use chatform::prelude::*;
//!
//! let mut forms = FormRegistry::new();
//! forms.register(
//!     FormBuilder::new("signup")
//!         .field(Field::text("name", "What is your name?"))
//!         .field(Field::integer("age", "How old are you?").with_failure_text("A number, please.")),
//!     SubmitBinding::from_fn(|s| async move {
//!         println!("{} is {}", s.get::<String>("name")?, s.get::<i64>("age")?);
//!         Ok(())
//!     }),
//! )?;
//! let engine = FormEngine::new(forms, Arc::new(MemoryStore::new()), transport);
//! ```

#[cfg(feature = "core")]
pub use chatform_engine as engine;
#[cfg(feature = "hooks")]
pub use chatform_hooks as hooks;
#[cfg(feature = "core")]
pub use chatform_proto as proto;
#[cfg(feature = "core")]
pub use chatform_rules as rules;
#[cfg(feature = "state-fs")]
pub use chatform_state_fs as state_fs;
#[cfg(feature = "state-memory")]
pub use chatform_state_memory as state_memory;

/// Happy-path imports for defining and running forms.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use chatform_proto::{
        Attachment, ChatId, Content, ContextBag, Decoration, FormId, HandlerError, Hook,
        HookContext, HookPoint, Message, MessageHandle, Phase, PromptError, RuleError,
        SessionKey, SessionStore, Transport, TransportError, UserId,
    };

    #[cfg(feature = "core")]
    pub use chatform_rules::{AsyncRule, CoercionRegistry, FieldType, Outcome, Pattern, Rule};

    #[cfg(feature = "core")]
    pub use chatform_engine::{
        DefinitionError, Field, FormBuilder, FormEngine, FormError, FormRegistry, Handled,
        Prompt, PromptRequest, SubmitBinding, SubmitHandler, Submission,
    };

    #[cfg(feature = "hooks")]
    pub use chatform_hooks::HookRegistry;

    #[cfg(feature = "state-memory")]
    pub use chatform_state_memory::MemoryStore;

    #[cfg(feature = "state-fs")]
    pub use chatform_state_fs::FsStore;

    #[cfg(feature = "core")]
    pub use std::sync::Arc;
}
