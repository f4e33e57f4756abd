#![deny(missing_docs)]
//! Field validation for chatform.
//!
//! A [`Rule`] turns one inbound [`Message`](chatform_proto::Message) into
//! an [`Outcome`]: either an accepted value or a rejection. Rules come in
//! three shapes, closed over in one enum:
//!
//! - [`Rule::Sync`]: a plain function. Returning `false` rejects; any
//!   other value is accepted as-is.
//! - [`Rule::Async`]: the same contract, awaited.
//! - [`Rule::Pattern`]: a declarative [`Pattern`] over message
//!   attributes. An absent result rejects.
//!
//! Fields that do not bring their own rule get one from the
//! [`CoercionRegistry`], keyed by [`FieldType`].

pub mod coerce;
pub mod field_type;
pub mod pattern;
pub mod rule;
pub mod transform;

pub use coerce::{CoercionRegistry, DATE_FORMAT, DATETIME_FORMAT, TIME_FORMAT};
pub use field_type::FieldType;
pub use pattern::Pattern;
pub use rule::{AsyncRule, Outcome, Rule};
pub use transform::Transform;
