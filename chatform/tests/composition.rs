//! Composition tests for the umbrella crate.
//!
//! Everything here is reached through `chatform::prelude` and the
//! feature-gated re-exports, the way a host application would use it.

use chatform::prelude::*;
use chatform_proto::test_utils::{RecordingHook, RecordingTransport};
use serde::Deserialize;
use std::sync::Mutex;

#[derive(Debug, Deserialize, PartialEq)]
struct Order {
    item: String,
    quantity: i64,
}

fn order_form() -> FormBuilder {
    FormBuilder::new("order")
        .field(Field::text("item", "What would you like?"))
        .field(Field::integer("quantity", "How many?").with_failure_text("Digits only."))
}

// --- Prelude ---

#[tokio::test]
async fn prelude_builds_and_runs_a_form() {
    let orders = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&orders);

    let mut forms = FormRegistry::new();
    forms
        .register(
            order_form(),
            SubmitBinding::from_fn(move |submission| {
                let sink = Arc::clone(&sink);
                async move {
                    let order: Order = submission.decode()?;
                    sink.lock().unwrap().push(order);
                    Ok(())
                }
            }),
        )
        .unwrap();

    let transport = Arc::new(RecordingTransport::new());
    let engine = FormEngine::new(forms, Arc::new(MemoryStore::new()), transport.clone());
    let key = SessionKey::new("c1", "u1");
    let ctx = ContextBag::new();

    engine.start(&FormId::new("order"), &key, &ctx).await.unwrap();
    let first = engine
        .handle_message(&Message::text("c1", "u1", "tea"), &ctx)
        .await
        .unwrap();
    assert_eq!(first, Handled::Advanced { slot: 1 });

    let bad = engine
        .handle_message(&Message::text("c1", "u1", "lots"), &ctx)
        .await
        .unwrap();
    assert_eq!(bad, Handled::Rejected { slot: 1 });

    let done = engine
        .handle_message(&Message::text("c1", "u1", "2"), &ctx)
        .await
        .unwrap();
    assert_eq!(done, Handled::Submitted { cleared: true });

    assert_eq!(
        *orders.lock().unwrap(),
        vec![Order {
            item: "tea".into(),
            quantity: 2
        }]
    );
    assert_eq!(
        transport.texts(),
        vec![
            "What would you like?",
            "How many?",
            "Digits only.",
            "How many?"
        ]
    );
    assert_eq!(engine.phase(&key).await.unwrap(), Phase::Idle);
}

#[tokio::test]
async fn hooks_are_wired_through_the_umbrella() {
    let hook = Arc::new(RecordingHook::new());
    let mut forms = FormRegistry::new();
    forms
        .register(order_form(), SubmitBinding::from_fn(|_| async { Ok(()) }))
        .unwrap();

    let engine = FormEngine::new(
        forms,
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingTransport::new()),
    )
    .with_hooks(HookRegistry::new().with(hook.clone()));

    let key = SessionKey::new("c1", "u1");
    let ctx = ContextBag::new();
    engine.start(&FormId::new("order"), &key, &ctx).await.unwrap();
    assert!(engine.cancel(&key).await.unwrap());

    assert_eq!(
        hook.points_seen(),
        vec![
            HookPoint::FormStarted,
            HookPoint::FieldPrompted,
            HookPoint::SessionCleared
        ]
    );
}

#[test]
fn pattern_rules_convert_into_rules() {
    let rule: Rule = Pattern::text().equals("yes").into();
    assert_eq!(rule.shape(), "pattern");
}

// --- Re-exported crates ---

#[test]
fn crate_reexports_are_reachable() {
    let _registry: chatform::engine::FormRegistry = chatform::engine::FormRegistry::new();
    let _coercions: chatform::rules::CoercionRegistry = chatform::rules::CoercionRegistry::default();
    let _key: chatform::proto::SessionKey = chatform::proto::SessionKey::new("c", "u");
    let _hooks: chatform::hooks::HookRegistry = chatform::hooks::HookRegistry::new();
    let _store: chatform::state_memory::MemoryStore = chatform::state_memory::MemoryStore::new();
}

#[test]
fn definition_errors_surface_through_the_prelude() {
    let mut forms = FormRegistry::new();
    let err = forms
        .register(
            FormBuilder::new("empty"),
            SubmitBinding::from_fn(|_| async { Ok(()) }),
        )
        .unwrap_err();
    assert!(matches!(err, DefinitionError::EmptyForm { .. }));
}
