//! Field descriptors and prompts.

use async_trait::async_trait;
use chatform_proto::{
    AttachmentKind, ChatId, CollectedValue, Content, ContextBag, Decoration, PromptError,
    SessionKey, UserId,
};
use chatform_rules::{FieldType, Rule};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// What a prompt callback gets to build its content from.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// The conversation being prompted.
    pub key: SessionKey,
    /// Values accepted so far, in slot order.
    pub collected: Vec<CollectedValue>,
    /// The context bag the host passed to the engine call.
    pub context: ContextBag,
}

impl PromptRequest {
    /// Build a request.
    pub fn new(key: SessionKey, collected: Vec<CollectedValue>, context: ContextBag) -> Self {
        Self {
            key,
            collected,
            context,
        }
    }

    /// The chat being prompted.
    pub fn chat(&self) -> &ChatId {
        &self.key.chat
    }

    /// The user being prompted.
    pub fn user(&self) -> &UserId {
        &self.key.user
    }

    /// An earlier field's accepted value.
    pub fn value(&self, name: &str) -> Option<&serde_json::Value> {
        self.collected
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.value)
    }
}

/// Produces prompt content when a field becomes current.
///
/// Called again on every re-prompt after a rejection, so the content may
/// change between attempts.
#[async_trait]
pub trait PromptCallback: Send + Sync {
    /// Build the prompt.
    async fn render(&self, request: &PromptRequest) -> Result<Content, PromptError>;
}

/// How a field asks for its value.
#[derive(Clone)]
pub enum Prompt {
    /// Fixed content, sent as-is.
    Static(Content),
    /// Content built lazily per conversation.
    Callback(Arc<dyn PromptCallback>),
}

impl Prompt {
    /// A fixed text prompt.
    pub fn text(text: impl Into<String>) -> Self {
        Prompt::Static(Content::text(text))
    }

    /// A prompt from a [`PromptCallback`] implementation.
    pub fn callback<C: PromptCallback + 'static>(callback: C) -> Self {
        Prompt::Callback(Arc::new(callback))
    }

    /// A prompt from a closure returning a future.
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(PromptRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Content, PromptError>> + Send + 'static,
    {
        Prompt::Callback(Arc::new(FnPrompt { f }))
    }

    /// Resolve to concrete content.
    pub async fn resolve(&self, request: &PromptRequest) -> Result<Content, PromptError> {
        match self {
            Prompt::Static(content) => Ok(content.clone()),
            Prompt::Callback(callback) => callback.render(request).await,
        }
    }
}

impl From<&str> for Prompt {
    fn from(s: &str) -> Self {
        Prompt::text(s)
    }
}

impl From<String> for Prompt {
    fn from(s: String) -> Self {
        Prompt::text(s)
    }
}

impl From<Content> for Prompt {
    fn from(content: Content) -> Self {
        Prompt::Static(content)
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prompt::Static(content) => f.debug_tuple("Prompt::Static").field(content).finish(),
            Prompt::Callback(_) => f.write_str("Prompt::Callback(..)"),
        }
    }
}

struct FnPrompt<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> PromptCallback for FnPrompt<F>
where
    F: Fn(PromptRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Content, PromptError>> + Send + 'static,
{
    async fn render(&self, request: &PromptRequest) -> Result<Content, PromptError> {
        (self.f)(request.clone()).await
    }
}

/// One step of a form.
///
/// ```ignore
/// let age = Field::integer("age", "How old are you?")
///     .with_failure_text("Please send a number.");
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    field_type: FieldType,
    prompt: Prompt,
    rule: Option<Rule>,
    failure_text: Option<String>,
    decoration: Option<Decoration>,
}

impl Field {
    /// A field of any type. Without [`Field::with_rule`], the rule comes
    /// from the coercion registry when the form is built.
    pub fn new(name: impl Into<String>, field_type: FieldType, prompt: impl Into<Prompt>) -> Self {
        Self {
            name: name.into(),
            field_type,
            prompt: prompt.into(),
            rule: None,
            failure_text: None,
            decoration: None,
        }
    }

    /// Free text.
    pub fn text(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::Text, prompt)
    }

    /// Base-10 integer.
    pub fn integer(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::Integer, prompt)
    }

    /// Decimal number.
    pub fn float(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::Float, prompt)
    }

    /// Calendar date.
    pub fn date(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::Date, prompt)
    }

    /// Date and time of day.
    pub fn datetime(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::DateTime, prompt)
    }

    /// Time of day.
    pub fn time(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::Time, prompt)
    }

    /// Any message, stored whole.
    pub fn message(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::Message, prompt)
    }

    /// A photo.
    pub fn photo(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::photo(), prompt)
    }

    /// A document.
    pub fn document(name: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self::new(name, FieldType::document(), prompt)
    }

    /// An attachment of a host-defined kind.
    pub fn attachment(
        name: impl Into<String>,
        kind: impl Into<AttachmentKind>,
        prompt: impl Into<Prompt>,
    ) -> Self {
        Self::new(name, FieldType::attachment(kind), prompt)
    }

    /// Validate with this rule instead of the type's default.
    pub fn with_rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Text sent verbatim when a reply is rejected.
    pub fn with_failure_text(mut self, text: impl Into<String>) -> Self {
        self.failure_text = Some(text.into());
        self
    }

    /// Opaque payload passed to the transport with this field's prompt.
    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decoration = Some(decoration);
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// The prompt.
    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    /// The explicit rule, if one was given.
    pub fn rule(&self) -> Option<&Rule> {
        self.rule.as_ref()
    }

    /// Rejection text, if any.
    pub fn failure_text(&self) -> Option<&str> {
        self.failure_text.as_deref()
    }

    /// This field's decoration, if any.
    pub fn decoration(&self) -> Option<&Decoration> {
        self.decoration.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PromptRequest {
        PromptRequest::new(
            SessionKey::new("c", "u"),
            vec![CollectedValue {
                name: "name".into(),
                value: serde_json::json!("Ann"),
            }],
            ContextBag::new(),
        )
    }

    #[tokio::test]
    async fn static_prompt_resolves_to_itself() {
        let prompt = Prompt::from("What is your name?");
        let content = prompt.resolve(&request()).await.unwrap();
        assert_eq!(content.as_text(), Some("What is your name?"));
    }

    #[tokio::test]
    async fn callback_prompt_sees_collected_values() {
        let prompt = Prompt::from_fn(|req: PromptRequest| async move {
            let name = req.value("name").and_then(|v| v.as_str()).unwrap_or("you");
            Ok(Content::text(format!("How old are you, {name}?")))
        });
        let content = prompt.resolve(&request()).await.unwrap();
        assert_eq!(content.as_text(), Some("How old are you, Ann?"));
    }

    #[test]
    fn builders_set_type_and_options() {
        let field = Field::photo("avatar", "Send a photo")
            .with_failure_text("That is not a photo.")
            .with_decoration(Decoration::new(serde_json::json!({"remove_keyboard": true})));
        assert_eq!(field.name(), "avatar");
        assert_eq!(field.field_type(), &FieldType::photo());
        assert_eq!(field.failure_text(), Some("That is not a photo."));
        assert!(field.rule().is_none());
        assert!(field.decoration().is_some());
    }
}
