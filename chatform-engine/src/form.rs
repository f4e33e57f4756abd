//! Form definitions: ordered, validated, immutable field lists.

use crate::error::DefinitionError;
use crate::field::Field;
use chatform_proto::{Decoration, FormId};
use chatform_rules::{CoercionRegistry, Rule};
use std::collections::HashSet;

/// Settings that apply to every field of a form.
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Decoration sent with prompts of fields that have none, e.g. a
    /// platform payload that removes a leftover reply keyboard.
    pub default_decoration: Option<Decoration>,
}

impl FormOptions {
    /// Options with nothing set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback decoration.
    pub fn with_default_decoration(mut self, decoration: Decoration) -> Self {
        self.default_decoration = Some(decoration);
        self
    }
}

/// Collects fields in presentation order.
///
/// ```ignore
/// let signup = FormBuilder::new("signup")
///     .field(Field::text("name", "What is your name?"))
///     .field(Field::integer("age", "How old are you?"))
///     .build(&CoercionRegistry::new())?;
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder {
    id: FormId,
    fields: Vec<Field>,
    options: FormOptions,
}

impl FormBuilder {
    /// Start a form with the given unique id.
    pub fn new(id: impl Into<FormId>) -> Self {
        Self {
            id: id.into(),
            fields: Vec::new(),
            options: FormOptions::default(),
        }
    }

    /// Append a field. Its slot is its position.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Replace the form options.
    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the fallback decoration.
    pub fn with_default_decoration(mut self, decoration: Decoration) -> Self {
        self.options.default_decoration = Some(decoration);
        self
    }

    /// The form id.
    pub fn id(&self) -> &FormId {
        &self.id
    }

    /// Validate the fields and resolve every rule.
    ///
    /// Fails on an empty form, an empty or repeated field name, or a field
    /// with no rule whose type has no default in `coercions`.
    pub fn build(self, coercions: &CoercionRegistry) -> Result<FormDefinition, DefinitionError> {
        if self.fields.is_empty() {
            return Err(DefinitionError::EmptyForm { form: self.id });
        }

        let mut seen = HashSet::new();
        let mut slots = Vec::with_capacity(self.fields.len());
        for (index, field) in self.fields.into_iter().enumerate() {
            if field.name().trim().is_empty() {
                return Err(DefinitionError::EmptyFieldName {
                    form: self.id,
                    slot: index,
                });
            }
            if !seen.insert(field.name().to_owned()) {
                return Err(DefinitionError::DuplicateField {
                    form: self.id,
                    field: field.name().to_owned(),
                });
            }
            let rule = match field.rule() {
                Some(rule) => rule.clone(),
                None => coercions.resolve(field.field_type()).ok_or_else(|| {
                    DefinitionError::UnsupportedType {
                        form: self.id.clone(),
                        field: field.name().to_owned(),
                        field_type: field.field_type().clone(),
                    }
                })?,
            };
            slots.push(FieldSlot { index, field, rule });
        }

        Ok(FormDefinition {
            id: self.id,
            slots,
            options: self.options,
        })
    }
}

/// A field bound to its slot index and resolved rule.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    index: usize,
    field: Field,
    rule: Rule,
}

impl FieldSlot {
    /// Position in the form, from 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Field name.
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// The descriptor.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The rule replies are checked with.
    pub fn rule(&self) -> &Rule {
        &self.rule
    }
}

/// An immutable, validated form. Always has at least one field.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    id: FormId,
    slots: Vec<FieldSlot>,
    options: FormOptions,
}

impl FormDefinition {
    /// The form id.
    pub fn id(&self) -> &FormId {
        &self.id
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the form has no fields. Never true once built.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The field at a slot.
    pub fn slot(&self, index: usize) -> Option<&FieldSlot> {
        self.slots.get(index)
    }

    /// All slots in order.
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    /// Slot index of a field name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name() == name)
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(FieldSlot::name)
    }

    /// Form options.
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Decoration for a slot's prompt: the field's own, else the form
    /// default.
    pub fn decoration_for<'a>(&'a self, slot: &'a FieldSlot) -> Option<&'a Decoration> {
        slot.field()
            .decoration()
            .or(self.options.default_decoration.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatform_rules::{FieldType, Pattern};

    fn coercions() -> CoercionRegistry {
        CoercionRegistry::new()
    }

    #[test]
    fn slots_follow_insertion_order() {
        let form = FormBuilder::new("signup")
            .field(Field::text("name", "Name?"))
            .field(Field::integer("age", "Age?"))
            .field(Field::date("born", "Born?"))
            .build(&coercions())
            .unwrap();
        assert_eq!(form.len(), 3);
        assert_eq!(form.field_names().collect::<Vec<_>>(), ["name", "age", "born"]);
        assert_eq!(form.position("age"), Some(1));
        assert_eq!(form.slot(2).unwrap().index(), 2);
        assert!(form.slot(3).is_none());
    }

    #[test]
    fn empty_form_is_rejected() {
        let err = FormBuilder::new("nothing").build(&coercions()).unwrap_err();
        assert_eq!(err, DefinitionError::EmptyForm { form: "nothing".into() });
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = FormBuilder::new("dup")
            .field(Field::text("name", "a"))
            .field(Field::integer("name", "b"))
            .build(&coercions())
            .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateField { ref field, .. } if field == "name"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let err = FormBuilder::new("blank")
            .field(Field::text("ok", "a"))
            .field(Field::text("  ", "b"))
            .build(&coercions())
            .unwrap_err();
        assert!(matches!(err, DefinitionError::EmptyFieldName { slot: 1, .. }));
    }

    #[test]
    fn unknown_type_without_rule_is_rejected() {
        let err = FormBuilder::new("voice")
            .field(Field::attachment("memo", "voice", "Record a memo"))
            .build(&coercions())
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UnsupportedType {
                form: "voice".into(),
                field: "memo".into(),
                field_type: FieldType::attachment("voice"),
            }
        );
    }

    #[test]
    fn explicit_rule_covers_unknown_type() {
        let form = FormBuilder::new("voice")
            .field(
                Field::attachment("memo", "voice", "Record a memo")
                    .with_rule(Pattern::attachment("voice")),
            )
            .build(&coercions());
        assert!(form.is_ok());
    }

    #[test]
    fn field_decoration_wins_over_default() {
        let default = Decoration::new(serde_json::json!({"remove_keyboard": true}));
        let own = Decoration::new(serde_json::json!({"keyboard": [["yes", "no"]]}));
        let form = FormBuilder::new("d")
            .with_default_decoration(default.clone())
            .field(Field::text("a", "a").with_decoration(own.clone()))
            .field(Field::text("b", "b"))
            .build(&coercions())
            .unwrap();
        assert_eq!(form.decoration_for(&form.slots()[0]), Some(&own));
        assert_eq!(form.decoration_for(&form.slots()[1]), Some(&default));
    }
}
