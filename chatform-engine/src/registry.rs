//! Registered forms and their completion bindings.

use crate::error::DefinitionError;
use crate::form::{FormBuilder, FormDefinition};
use crate::handler::SubmitBinding;
use chatform_proto::FormId;
use chatform_rules::CoercionRegistry;
use std::collections::HashMap;
use std::sync::Arc;

/// A form definition together with its handler binding.
#[derive(Debug, Clone)]
pub struct RegisteredForm {
    definition: Arc<FormDefinition>,
    binding: SubmitBinding,
}

impl RegisteredForm {
    /// The definition.
    pub fn definition(&self) -> &Arc<FormDefinition> {
        &self.definition
    }

    /// The completion binding.
    pub fn binding(&self) -> &SubmitBinding {
        &self.binding
    }
}

/// Every form an engine can run, keyed by unique id.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    coercions: CoercionRegistry,
    forms: HashMap<FormId, RegisteredForm>,
}

impl FormRegistry {
    /// An empty registry using the default coercions.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry using host-supplied coercions.
    pub fn with_coercions(coercions: CoercionRegistry) -> Self {
        Self {
            coercions,
            forms: HashMap::new(),
        }
    }

    /// The coercions new forms are built with.
    pub fn coercions(&self) -> &CoercionRegistry {
        &self.coercions
    }

    /// Mutable access to coercions, for registering host types before
    /// registering forms that use them.
    pub fn coercions_mut(&mut self) -> &mut CoercionRegistry {
        &mut self.coercions
    }

    /// Build and register a form.
    ///
    /// Fails if the id is taken or the form itself is invalid; nothing is
    /// registered in either case.
    pub fn register(
        &mut self,
        form: FormBuilder,
        binding: SubmitBinding,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        if self.forms.contains_key(form.id()) {
            return Err(DefinitionError::DuplicateForm(form.id().clone()));
        }
        let definition = Arc::new(form.build(&self.coercions)?);
        self.forms.insert(
            definition.id().clone(),
            RegisteredForm {
                definition: Arc::clone(&definition),
                binding,
            },
        );
        Ok(definition)
    }

    /// Look up a form.
    pub fn get(&self, id: &FormId) -> Option<&RegisteredForm> {
        self.forms.get(id)
    }

    /// Whether a form id is registered.
    pub fn contains(&self, id: &FormId) -> bool {
        self.forms.contains_key(id)
    }

    /// Number of registered forms.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Whether no forms are registered.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    /// Registered form ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &FormId> {
        self.forms.keys()
    }
}
