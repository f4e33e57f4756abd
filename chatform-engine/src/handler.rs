//! Completion handlers and what they receive.

use async_trait::async_trait;
use chatform_proto::{ChatId, CollectedValue, ContextBag, FormId, HandlerError, SessionKey, UserId};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A completed form, handed to its [`SubmitHandler`].
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Submission {
    /// The conversation that filled the form.
    pub key: SessionKey,
    /// The form that was filled.
    pub form: FormId,
    /// Accepted values, one per field, in slot order.
    pub values: Vec<CollectedValue>,
    /// Only the context keys the binding declared.
    pub context: ContextBag,
}

impl Submission {
    /// Assemble a submission.
    pub fn new(
        key: SessionKey,
        form: FormId,
        values: Vec<CollectedValue>,
        context: ContextBag,
    ) -> Self {
        Self {
            key,
            form,
            values,
            context,
        }
    }

    /// The chat.
    pub fn chat(&self) -> &ChatId {
        &self.key.chat
    }

    /// The user.
    pub fn user(&self) -> &UserId {
        &self.key.user
    }

    /// Raw value of a field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }

    /// Deserialize one field's value.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<T, HandlerError> {
        let value = self.value(name).ok_or_else(|| HandlerError::Decode {
            field: name.to_owned(),
            message: "no such field".into(),
        })?;
        serde_json::from_value(value.clone()).map_err(|e| HandlerError::Decode {
            field: name.to_owned(),
            message: e.to_string(),
        })
    }

    /// Values as a JSON object keyed by field name.
    pub fn to_map(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    /// Deserialize the whole form into a host type whose fields match the
    /// form's field names.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(Value::Object(self.to_map())).map_err(|e| HandlerError::Decode {
            field: String::new(),
            message: e.to_string(),
        })
    }
}

/// Receives a form once every field is accepted.
///
/// Runs at most once per started form. An error is reported to the caller
/// of `handle_message`; the session is not rolled back.
///
/// The handler runs while its conversation is locked. Engine calls for
/// that same conversation made from inside it return
/// [`FormError::Reentered`](crate::FormError::Reentered); other
/// conversations are free.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Consume the submission.
    async fn submit(&self, submission: Submission) -> Result<(), HandlerError>;
}

struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> SubmitHandler for FnHandler<F>
where
    F: Fn(Submission) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn submit(&self, submission: Submission) -> Result<(), HandlerError> {
        (self.f)(submission).await
    }
}

/// Wrap an async closure as a [`SubmitHandler`].
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn SubmitHandler>
where
    F: Fn(Submission) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// How a form's completion is handled.
#[derive(Clone)]
pub struct SubmitBinding {
    handler: Arc<dyn SubmitHandler>,
    context_keys: Vec<String>,
    clear_on_submit: bool,
}

impl SubmitBinding {
    /// Bind a handler. Sessions are cleared after submission by default.
    pub fn new(handler: Arc<dyn SubmitHandler>) -> Self {
        Self {
            handler,
            context_keys: Vec::new(),
            clear_on_submit: true,
        }
    }

    /// Bind an async closure.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(Submission) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        Self::new(handler_fn(f))
    }

    /// Declare a context key the handler needs. Submission fails with
    /// [`HandlerError::MissingContext`] if the host does not supply it.
    pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
        self.context_keys.push(key.into());
        self
    }

    /// Declare several context keys.
    pub fn with_context_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.context_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Keep the completed session instead of clearing it.
    pub fn with_clear_on_submit(mut self, clear: bool) -> Self {
        self.clear_on_submit = clear;
        self
    }

    /// The handler.
    pub fn handler(&self) -> &Arc<dyn SubmitHandler> {
        &self.handler
    }

    /// Declared context keys.
    pub fn context_keys(&self) -> &[String] {
        &self.context_keys
    }

    /// Whether the session is cleared after submission.
    pub fn clear_on_submit(&self) -> bool {
        self.clear_on_submit
    }
}

impl fmt::Debug for SubmitBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitBinding")
            .field("context_keys", &self.context_keys)
            .field("clear_on_submit", &self.clear_on_submit)
            .finish_non_exhaustive()
    }
}
