//! Declarative pattern filters over message attributes.
//!
//! A [`Pattern`] is evaluated against a message and yields
//! `Option<Value>`. `None` is "no match". Every step that depends on an
//! inner result propagates `None`, so an absent attribute anywhere in a
//! chain makes the chain absent.
//!
//! Combinators treat a result as *failing* when it is absent, JSON
//! `null`, or `false`. Everything else passes, including `0` and `""`:
//!
//! - `a & b` yields the first failing result, or the last result when
//!   all pass.
//! - `a | b` yields the first passing result, or the last result when
//!   none pass.
//! - `!a` yields `true` when `a` fails and `false` otherwise.
//!
//! A rule built from a pattern rejects when the final result fails.
//!
//! ```ignore
//! use chatform_rules::{Pattern, transform};
//!
//! // Accept "yes"/"no" in any case, store it lowercased.
//! let yes_no = Pattern::text()
//!     .apply(transform::lowercase())
//!     .one_of(["yes", "no"]);
//! ```

use crate::transform::Transform;
use chatform_proto::{AttachmentKind, Message};
use regex::Regex;
use serde_json::Value;
use std::ops::{BitAnd, BitOr, Not};

/// A declarative predicate/extractor over a message.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum Pattern {
    /// The message text.
    Text,
    /// The media caption.
    Caption,
    /// The payload of the first attachment of this kind.
    Attachment(AttachmentKind),
    /// The whole message, as JSON.
    Message,
    /// Map the inner result through a transform.
    Map {
        /// Source of the value.
        inner: Box<Pattern>,
        /// Mapping applied to it.
        transform: Transform,
    },
    /// `true` when the inner result equals `expected`.
    Equals {
        /// Source of the value.
        inner: Box<Pattern>,
        /// Value to compare against.
        expected: Value,
    },
    /// The inner result itself when it is one of `options`, absent otherwise.
    OneOf {
        /// Source of the value.
        inner: Box<Pattern>,
        /// Allowed values.
        options: Vec<Value>,
    },
    /// The first regex match inside the inner string result.
    Matches {
        /// Source of the value.
        inner: Box<Pattern>,
        /// Expression to search for.
        regex: Regex,
    },
    /// All must pass.
    And(Vec<Pattern>),
    /// At least one must pass.
    Or(Vec<Pattern>),
    /// Negation.
    Not(Box<Pattern>),
}

/// Whether a combinator result counts as a failure.
pub fn fails(result: &Option<Value>) -> bool {
    matches!(result, None | Some(Value::Null) | Some(Value::Bool(false)))
}

impl Pattern {
    /// The message text.
    pub fn text() -> Self {
        Pattern::Text
    }

    /// The media caption.
    pub fn caption() -> Self {
        Pattern::Caption
    }

    /// The payload of an attachment kind.
    pub fn attachment(kind: impl Into<AttachmentKind>) -> Self {
        Pattern::Attachment(kind.into())
    }

    /// The whole message.
    pub fn message() -> Self {
        Pattern::Message
    }

    /// Pipe the result through a transform.
    pub fn apply(self, transform: Transform) -> Self {
        Pattern::Map {
            inner: Box::new(self),
            transform,
        }
    }

    /// Pipe the result through a closure.
    pub fn map<F>(self, name: &'static str, f: F) -> Self
    where
        F: Fn(&Value) -> Option<Value> + Send + Sync + 'static,
    {
        self.apply(Transform::new(name, f))
    }

    /// Compare the result to a value.
    pub fn equals(self, expected: impl Into<Value>) -> Self {
        Pattern::Equals {
            inner: Box::new(self),
            expected: expected.into(),
        }
    }

    /// Keep the result only when it is one of `options`.
    pub fn one_of<I, V>(self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Pattern::OneOf {
            inner: Box::new(self),
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Search the (string) result for a regex; yields the matched text.
    pub fn matches(self, regex: Regex) -> Self {
        Pattern::Matches {
            inner: Box::new(self),
            regex,
        }
    }

    /// Both must pass. Flattens nested conjunctions.
    pub fn and(self, other: Pattern) -> Self {
        match self {
            Pattern::And(mut items) => {
                items.push(other);
                Pattern::And(items)
            }
            first => Pattern::And(vec![first, other]),
        }
    }

    /// Either must pass. Flattens nested disjunctions.
    pub fn or(self, other: Pattern) -> Self {
        match self {
            Pattern::Or(mut items) => {
                items.push(other);
                Pattern::Or(items)
            }
            first => Pattern::Or(vec![first, other]),
        }
    }

    /// Evaluate against a message.
    pub fn evaluate(&self, message: &Message) -> Option<Value> {
        match self {
            Pattern::Text => message.text.clone().map(Value::String),
            Pattern::Caption => message.caption.clone().map(Value::String),
            // Payloads that read as a miss still count as present.
            Pattern::Attachment(kind) => message.attachment(kind).map(|a| match &a.payload {
                Value::Null | Value::Bool(false) => Value::Object(Default::default()),
                payload => payload.clone(),
            }),
            Pattern::Message => serde_json::to_value(message).ok(),
            Pattern::Map { inner, transform } => {
                let value = inner.evaluate(message)?;
                transform.apply(&value)
            }
            Pattern::Equals { inner, expected } => {
                let value = inner.evaluate(message)?;
                Some(Value::Bool(&value == expected))
            }
            Pattern::OneOf { inner, options } => {
                let value = inner.evaluate(message)?;
                options.contains(&value).then_some(value)
            }
            Pattern::Matches { inner, regex } => {
                let value = inner.evaluate(message)?;
                let found = regex.find(value.as_str()?)?;
                Some(Value::String(found.as_str().to_owned()))
            }
            Pattern::And(items) => {
                let mut last = Some(Value::Bool(true));
                for item in items {
                    last = item.evaluate(message);
                    if fails(&last) {
                        return last;
                    }
                }
                last
            }
            Pattern::Or(items) => {
                let mut last = None;
                for item in items {
                    last = item.evaluate(message);
                    if !fails(&last) {
                        return last;
                    }
                }
                last
            }
            Pattern::Not(inner) => Some(Value::Bool(fails(&inner.evaluate(message)))),
        }
    }
}

impl BitAnd for Pattern {
    type Output = Pattern;

    fn bitand(self, rhs: Pattern) -> Pattern {
        self.and(rhs)
    }
}

impl BitOr for Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: Pattern) -> Pattern {
        self.or(rhs)
    }
}

impl Not for Pattern {
    type Output = Pattern;

    fn not(self) -> Pattern {
        Pattern::Not(Box::new(self))
    }
}
