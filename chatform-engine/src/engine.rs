//! The form progression state machine.

use crate::error::FormError;
use crate::field::PromptRequest;
use crate::form::FieldSlot;
use crate::handler::Submission;
use crate::locks::SessionLocks;
use crate::registry::{FormRegistry, RegisteredForm};
use chatform_hooks::HookRegistry;
use chatform_proto::{
    CollectedValue, ContextBag, FormId, HandlerError, HookContext, HookPoint, Message,
    MessageHandle, Phase, SessionKey, SessionState, SessionStore, Slot, Transport,
};
use chatform_rules::Outcome;
use std::sync::Arc;

/// What [`FormEngine::handle_message`] did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// No form of this engine is waiting on the conversation. The host
    /// should route the message elsewhere.
    Ignored,
    /// The reply failed the field's rule; the field was asked again.
    Rejected {
        /// Slot that is still awaited.
        slot: usize,
    },
    /// The reply was accepted and the next field was asked.
    Advanced {
        /// Slot now awaited.
        slot: usize,
    },
    /// The last field was accepted and the handler ran.
    Submitted {
        /// Whether the session was cleared afterwards.
        cleared: bool,
    },
}

/// Drives forms for every conversation.
///
/// One engine owns the form registry, the session store, the transport
/// and the hooks. It is `Send + Sync`; share it behind an `Arc` and call
/// it from as many tasks as there are inbound messages. Calls for the
/// same conversation are serialized; calls for different conversations
/// run concurrently.
pub struct FormEngine {
    forms: FormRegistry,
    store: Arc<dyn SessionStore>,
    transport: Arc<dyn Transport>,
    hooks: HookRegistry,
    locks: SessionLocks,
}

impl FormEngine {
    /// Create an engine over a registry, a store and a transport.
    pub fn new(
        forms: FormRegistry,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            forms,
            store,
            transport,
            hooks: HookRegistry::new(),
            locks: SessionLocks::new(),
        }
    }

    /// Attach lifecycle hooks.
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    /// The registered forms.
    pub fn forms(&self) -> &FormRegistry {
        &self.forms
    }

    /// Begin a form for a conversation and send its first prompt.
    ///
    /// Fails with [`FormError::AlreadyActive`] when the conversation has
    /// any session, including a completed one kept by
    /// `clear_on_submit = false`; the stored state is left alone. The
    /// session is written before the first prompt is sent, so a transport
    /// failure leaves the conversation awaiting slot 0.
    ///
    /// Called from a submit handler of the same conversation, this fails
    /// with [`FormError::Reentered`]: the handler runs before the finished
    /// session is cleared. Chain forms after `handle_message` returns
    /// [`Handled::Submitted`] instead.
    pub async fn start(
        &self,
        form: &FormId,
        key: &SessionKey,
        context: &ContextBag,
    ) -> Result<(), FormError> {
        let registered = self
            .forms
            .get(form)
            .ok_or_else(|| FormError::UnknownForm(form.clone()))?;

        self.locks
            .exclusive(key, self.start_locked(registered, form, key, context))
            .await
            .map_err(|_| reentered(key))?
    }

    async fn start_locked(
        &self,
        registered: &RegisteredForm,
        form: &FormId,
        key: &SessionKey,
        context: &ContextBag,
    ) -> Result<(), FormError> {
        if let Some(existing) = self.store.read(key).await? {
            return Err(FormError::AlreadyActive {
                key: key.clone(),
                phase: Phase::of(Some(&existing)),
            });
        }

        let state = SessionState::new(form.clone());
        self.store.write(key, state.clone()).await?;
        tracing::info!(chat = %key.chat, user = %key.user, form = %form, "form started");
        self.hooks
            .dispatch(&HookContext::new(
                HookPoint::FormStarted,
                key.clone(),
                form.clone(),
            ))
            .await;

        let first = registered
            .definition()
            .slot(0)
            .ok_or_else(|| corrupt(key, form, "form has no slot 0"))?;
        self.prompt(registered, first, key, &state.collected, context)
            .await?;
        Ok(())
    }

    /// Feed one inbound message to the conversation it came from.
    ///
    /// Returns [`Handled::Ignored`] when the conversation has no session,
    /// when its session belongs to a form this engine does not know, or
    /// when the session is completed and awaiting cleanup.
    ///
    /// A rule that raises surfaces as [`FormError::Rule`] with the session
    /// unchanged. On the accepting path the session is written before any
    /// prompt is sent or the handler runs; later failures do not undo it.
    ///
    /// Rules, prompts, hooks and handlers must not call back into the
    /// engine for the conversation being handled; such calls fail with
    /// [`FormError::Reentered`].
    pub async fn handle_message(
        &self,
        message: &Message,
        context: &ContextBag,
    ) -> Result<Handled, FormError> {
        let key = message.key();
        self.locks
            .exclusive(&key, self.handle_locked(&key, message, context))
            .await
            .map_err(|_| reentered(&key))?
    }

    async fn handle_locked(
        &self,
        key: &SessionKey,
        message: &Message,
        context: &ContextBag,
    ) -> Result<Handled, FormError> {
        let Some(mut state) = self.store.read(key).await? else {
            return Ok(Handled::Ignored);
        };
        let Some(registered) = self.forms.get(&state.form) else {
            tracing::warn!(
                chat = %key.chat,
                user = %key.user,
                form = %state.form,
                "session references a form this engine does not know"
            );
            return Ok(Handled::Ignored);
        };
        let Slot::Awaiting(index) = state.slot else {
            tracing::debug!(chat = %key.chat, user = %key.user, form = %state.form, "form completed, awaiting cleanup");
            return Ok(Handled::Ignored);
        };

        let definition = registered.definition();
        let slot = definition
            .slot(index)
            .ok_or_else(|| corrupt(key, &state.form, format!("slot {index} out of range")))?;
        if state.collected.len() != index {
            return Err(corrupt(
                key,
                &state.form,
                format!(
                    "{} values collected while awaiting slot {index}",
                    state.collected.len()
                ),
            ));
        }

        let outcome = slot
            .rule()
            .attempt(message, context)
            .await
            .map_err(|source| FormError::Rule {
                field: slot.name().to_owned(),
                source,
            })?;
        tracing::debug!(
            chat = %key.chat,
            user = %key.user,
            form = %state.form,
            field = slot.name(),
            slot = index,
            rule = slot.rule().shape(),
            accepted = outcome.is_accepted(),
            "rule evaluated"
        );

        let value = match outcome {
            Outcome::Rejected => {
                self.reject(registered, slot, key, &state, context).await?;
                return Ok(Handled::Rejected { slot: index });
            }
            Outcome::Accepted(value) => value,
        };

        let next = state.accept(slot.name(), value.clone(), definition.len());
        self.store.write(key, state.clone()).await?;
        self.hooks
            .dispatch(
                &HookContext::new(HookPoint::FieldAccepted, key.clone(), state.form.clone())
                    .with_field(slot.name(), index)
                    .with_value(value),
            )
            .await;

        match next {
            Slot::Awaiting(next_index) => {
                let next_slot = definition.slot(next_index).ok_or_else(|| {
                    corrupt(key, &state.form, format!("slot {next_index} out of range"))
                })?;
                self.prompt(registered, next_slot, key, &state.collected, context)
                    .await?;
                Ok(Handled::Advanced { slot: next_index })
            }
            Slot::Completed => {
                let cleared = self.submit(registered, key, state, context).await?;
                Ok(Handled::Submitted { cleared })
            }
        }
    }

    /// The conversation's current phase.
    pub async fn phase(&self, key: &SessionKey) -> Result<Phase, FormError> {
        let state = self.store.read(key).await?;
        Ok(Phase::of(state.as_ref()))
    }

    /// Abandon the conversation's session, whatever its phase. Returns
    /// whether there was one.
    pub async fn cancel(&self, key: &SessionKey) -> Result<bool, FormError> {
        self.locks
            .exclusive(key, self.cancel_locked(key))
            .await
            .map_err(|_| reentered(key))?
    }

    async fn cancel_locked(&self, key: &SessionKey) -> Result<bool, FormError> {
        let Some(state) = self.store.read(key).await? else {
            return Ok(false);
        };
        self.store.delete(key).await?;
        tracing::info!(chat = %key.chat, user = %key.user, form = %state.form, "session cancelled");
        self.hooks
            .dispatch(&HookContext::new(
                HookPoint::SessionCleared,
                key.clone(),
                state.form,
            ))
            .await;
        Ok(true)
    }

    async fn reject(
        &self,
        registered: &RegisteredForm,
        slot: &FieldSlot,
        key: &SessionKey,
        state: &SessionState,
        context: &ContextBag,
    ) -> Result<(), FormError> {
        self.hooks
            .dispatch(
                &HookContext::new(HookPoint::FieldRejected, key.clone(), state.form.clone())
                    .with_field(slot.name(), slot.index()),
            )
            .await;
        if let Some(text) = slot.field().failure_text() {
            self.transport.send_text(&key.chat, text).await?;
        }
        self.prompt(registered, slot, key, &state.collected, context)
            .await?;
        Ok(())
    }

    async fn prompt(
        &self,
        registered: &RegisteredForm,
        slot: &FieldSlot,
        key: &SessionKey,
        collected: &[CollectedValue],
        context: &ContextBag,
    ) -> Result<MessageHandle, FormError> {
        let definition = registered.definition();
        let request = PromptRequest::new(key.clone(), collected.to_vec(), context.clone());
        let content = slot
            .field()
            .prompt()
            .resolve(&request)
            .await
            .map_err(|source| FormError::Prompt {
                field: slot.name().to_owned(),
                source,
            })?;
        let handle = self
            .transport
            .send_prompt(&key.chat, &content, definition.decoration_for(slot))
            .await?;
        tracing::debug!(
            chat = %key.chat,
            user = %key.user,
            form = %definition.id(),
            field = slot.name(),
            slot = slot.index(),
            message_id = %handle.message_id,
            "prompt sent"
        );
        self.hooks
            .dispatch(
                &HookContext::new(
                    HookPoint::FieldPrompted,
                    key.clone(),
                    definition.id().clone(),
                )
                .with_field(slot.name(), slot.index()),
            )
            .await;
        Ok(handle)
    }

    /// Run the handler for a completed session, then clear it if the
    /// binding asks for that. Clearing happens even when the handler
    /// fails; the handler's error wins over a clearing error.
    async fn submit(
        &self,
        registered: &RegisteredForm,
        key: &SessionKey,
        state: SessionState,
        context: &ContextBag,
    ) -> Result<bool, FormError> {
        let binding = registered.binding();
        let form = state.form.clone();

        let handled: Result<(), HandlerError> = async {
            let selected = context
                .select(binding.context_keys().iter().map(String::as_str))
                .map_err(HandlerError::MissingContext)?;
            let submission = Submission::new(key.clone(), form.clone(), state.collected, selected);
            binding.handler().submit(submission).await
        }
        .await;
        match &handled {
            Ok(()) => {
                tracing::info!(chat = %key.chat, user = %key.user, form = %form, "form submitted")
            }
            Err(e) => {
                tracing::warn!(chat = %key.chat, user = %key.user, form = %form, error = %e, "submit handler failed")
            }
        }
        self.hooks
            .dispatch(&HookContext::new(
                HookPoint::FormSubmitted,
                key.clone(),
                form.clone(),
            ))
            .await;

        if !binding.clear_on_submit() {
            handled?;
            return Ok(false);
        }

        let cleared = self.store.delete(key).await;
        if cleared.is_ok() {
            self.hooks
                .dispatch(&HookContext::new(
                    HookPoint::SessionCleared,
                    key.clone(),
                    form.clone(),
                ))
                .await;
        }
        match (handled, cleared) {
            (Err(handler), Err(clear)) => {
                tracing::warn!(
                    chat = %key.chat,
                    user = %key.user,
                    form = %form,
                    error = %clear,
                    "clearing session failed after handler error"
                );
                Err(handler.into())
            }
            (Err(handler), Ok(())) => Err(handler.into()),
            (Ok(()), Err(clear)) => Err(clear.into()),
            (Ok(()), Ok(())) => Ok(true),
        }
    }
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("forms", &self.forms.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

fn reentered(key: &SessionKey) -> FormError {
    FormError::Reentered { key: key.clone() }
}

fn corrupt(key: &SessionKey, form: &FormId, reason: impl Into<String>) -> FormError {
    FormError::CorruptSession {
        key: key.clone(),
        form: form.clone(),
        reason: reason.into(),
    }
}
