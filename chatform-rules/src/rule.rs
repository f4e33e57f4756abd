//! The three rule shapes and their single evaluation entry point.

use crate::pattern::{Pattern, fails};
use async_trait::async_trait;
use chatform_proto::{ContextBag, Message, RuleError};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Result of running a rule against a reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The reply is valid; this is the value to store.
    Accepted(Value),
    /// The reply is invalid; the field is asked again.
    Rejected,
}

impl Outcome {
    /// Interpret a function rule's return. Only a literal `false` rejects.
    pub fn from_function(value: Value) -> Self {
        match value {
            Value::Bool(false) => Outcome::Rejected,
            value => Outcome::Accepted(value),
        }
    }

    /// Interpret a pattern's result. Absent, `null`, and `false` reject.
    pub fn from_pattern(result: Option<Value>) -> Self {
        if fails(&result) {
            return Outcome::Rejected;
        }
        match result {
            Some(value) => Outcome::Accepted(value),
            None => Outcome::Rejected,
        }
    }

    /// Whether the reply was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// The accepted value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Accepted(v) => Some(v),
            Outcome::Rejected => None,
        }
    }
}

/// Signature of a synchronous rule function.
pub type SyncRuleFn = dyn Fn(&Message, &ContextBag) -> Result<Value, RuleError> + Send + Sync;

/// An asynchronous rule: a lookup against a database, a remote check.
///
/// Same contract as a sync rule: return `Value::Bool(false)` to reject,
/// anything else to accept, `Err` when the check itself broke.
#[async_trait]
pub trait AsyncRule: Send + Sync {
    /// Check one reply.
    async fn check(&self, message: &Message, context: &ContextBag) -> Result<Value, RuleError>;
}

/// Validation/coercion logic for one field.
#[derive(Clone)]
pub enum Rule {
    /// Plain function, called inline.
    Sync(Arc<SyncRuleFn>),
    /// Asynchronous function, awaited. No timeout is applied.
    Async(Arc<dyn AsyncRule>),
    /// Declarative pattern filter.
    Pattern(Pattern),
}

impl Rule {
    /// A synchronous rule from a closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Message, &ContextBag) -> Result<Value, RuleError> + Send + Sync + 'static,
    {
        Rule::Sync(Arc::new(f))
    }

    /// An asynchronous rule from an [`AsyncRule`] implementation.
    pub fn from_async<R: AsyncRule + 'static>(rule: R) -> Self {
        Rule::Async(Arc::new(rule))
    }

    /// An asynchronous rule from a closure returning a future. The
    /// closure receives owned copies so the future can be `'static`.
    pub fn async_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Message, ContextBag) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, RuleError>> + Send + 'static,
    {
        Rule::Async(Arc::new(AsyncFnRule { f }))
    }

    /// A pattern rule.
    pub fn pattern(pattern: Pattern) -> Self {
        Rule::Pattern(pattern)
    }

    /// Shape name, for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            Rule::Sync(_) => "sync",
            Rule::Async(_) => "async",
            Rule::Pattern(_) => "pattern",
        }
    }

    /// Run the rule against a reply.
    ///
    /// Errors are rules that raised; they are not rejections and are
    /// surfaced to the caller untouched.
    pub async fn attempt(
        &self,
        message: &Message,
        context: &ContextBag,
    ) -> Result<Outcome, RuleError> {
        match self {
            Rule::Sync(f) => f(message, context).map(Outcome::from_function),
            Rule::Async(rule) => rule
                .check(message, context)
                .await
                .map(Outcome::from_function),
            Rule::Pattern(pattern) => Ok(Outcome::from_pattern(pattern.evaluate(message))),
        }
    }
}

impl From<Pattern> for Rule {
    fn from(pattern: Pattern) -> Self {
        Rule::Pattern(pattern)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Sync(_) => f.write_str("Rule::Sync(..)"),
            Rule::Async(_) => f.write_str("Rule::Async(..)"),
            Rule::Pattern(p) => f.debug_tuple("Rule::Pattern").field(p).finish(),
        }
    }
}

struct AsyncFnRule<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> AsyncRule for AsyncFnRule<F>
where
    F: Fn(Message, ContextBag) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, RuleError>> + Send + 'static,
{
    async fn check(&self, message: &Message, context: &ContextBag) -> Result<Value, RuleError> {
        (self.f)(message.clone(), context.clone()).await
    }
}
