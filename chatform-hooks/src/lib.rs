#![deny(missing_docs)]
//! Hook registry for chatform.
//!
//! The [`HookRegistry`] collects [`Hook`] implementations into an ordered
//! pipeline. At each lifecycle point, hooks registered for that point are
//! called in registration order. Hooks only observe: there is no action
//! to return and nothing to short-circuit. A hook error is logged with
//! `tracing` and the next hook still runs.

use chatform_proto::hook::{Hook, HookContext};
use std::sync::Arc;

/// Dispatches lifecycle events to an ordered list of hooks.
#[derive(Clone)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn Hook>>,
}

impl HookRegistry {
    /// Create a new empty hook registry.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook to the end of the pipeline.
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.push(hook);
    }

    /// Builder form of [`HookRegistry::add`].
    pub fn with(mut self, hook: Arc<dyn Hook>) -> Self {
        self.add(hook);
        self
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Whether no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Dispatch an event to every hook registered for its point.
    ///
    /// Returns how many hooks completed without error.
    pub async fn dispatch(&self, ctx: &HookContext) -> usize {
        let mut completed = 0;
        for hook in &self.hooks {
            if !hook.points().contains(&ctx.point) {
                continue;
            }

            match hook.on_event(ctx).await {
                Ok(()) => completed += 1,
                Err(e) => {
                    tracing::warn!(
                        point = ?ctx.point,
                        chat = %ctx.key.chat,
                        user = %ctx.key.user,
                        form = %ctx.form,
                        error = %e,
                        "hook failed"
                    );
                }
            }
        }
        completed
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
