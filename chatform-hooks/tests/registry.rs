use chatform_hooks::HookRegistry;
use chatform_proto::error::HookError;
use chatform_proto::hook::{Hook, HookContext, HookPoint};
use chatform_proto::session::SessionKey;
use chatform_proto::test_utils::RecordingHook;
use std::sync::Arc;

fn ctx(point: HookPoint) -> HookContext {
    HookContext::new(point, SessionKey::new("chat", "user"), "signup".into())
}

// --- Empty registry ---

#[tokio::test]
async fn empty_registry_runs_nothing() {
    let registry = HookRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.dispatch(&ctx(HookPoint::FormStarted)).await, 0);
}

// --- Single hook ---

#[tokio::test]
async fn single_hook_dispatches() {
    let mut registry = HookRegistry::new();
    let hook = Arc::new(RecordingHook::new());
    registry.add(hook.clone());

    let event = ctx(HookPoint::FieldAccepted).with_field("name", 0);
    assert_eq!(registry.dispatch(&event).await, 1);

    let events = hook.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].point, HookPoint::FieldAccepted);
    assert_eq!(events[0].field.as_deref(), Some("name"));
    assert_eq!(events[0].slot, Some(0));
}

// --- Hook ordering ---

/// A hook that records its name for ordering verification.
struct NamedHook {
    name: String,
    log: Arc<std::sync::Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Hook for NamedHook {
    fn points(&self) -> &[HookPoint] {
        &[HookPoint::FieldPrompted, HookPoint::FormSubmitted]
    }

    async fn on_event(&self, _ctx: &HookContext) -> Result<(), HookError> {
        self.log.lock().unwrap().push(self.name.clone());
        Ok(())
    }
}

fn named(name: &str, log: &Arc<std::sync::Mutex<Vec<String>>>) -> Arc<NamedHook> {
    Arc::new(NamedHook {
        name: name.into(),
        log: Arc::clone(log),
    })
}

#[tokio::test]
async fn hooks_execute_in_registration_order() {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));

    let registry = HookRegistry::new()
        .with(named("first", &log))
        .with(named("second", &log))
        .with(named("third", &log));
    assert_eq!(registry.len(), 3);

    registry.dispatch(&ctx(HookPoint::FieldPrompted)).await;

    let log = log.lock().unwrap();
    assert_eq!(*log, vec!["first", "second", "third"]);
}

// --- Point filtering ---

#[tokio::test]
async fn hooks_only_fire_at_registered_points() {
    let submit_only = Arc::new(RecordingHook::at(&[HookPoint::FormSubmitted]));
    let registry = HookRegistry::new().with(submit_only.clone());

    assert_eq!(registry.dispatch(&ctx(HookPoint::FieldRejected)).await, 0);
    assert_eq!(registry.dispatch(&ctx(HookPoint::FormSubmitted)).await, 1);
    assert_eq!(submit_only.points_seen(), vec![HookPoint::FormSubmitted]);
}

#[tokio::test]
async fn hook_outside_its_points_is_never_called() {
    struct ClearOnly;
    #[async_trait::async_trait]
    impl Hook for ClearOnly {
        fn points(&self) -> &[HookPoint] {
            &[HookPoint::SessionCleared]
        }
        async fn on_event(&self, _ctx: &HookContext) -> Result<(), HookError> {
            panic!("should not fire outside SessionCleared");
        }
    }

    let registry = HookRegistry::new().with(Arc::new(ClearOnly));
    for point in HookPoint::ALL {
        if point != HookPoint::SessionCleared {
            registry.dispatch(&ctx(point)).await;
        }
    }
}

// --- Error handling ---

/// A hook that errors (but errors don't stop the pipeline).
struct ErroringHook;

#[async_trait::async_trait]
impl Hook for ErroringHook {
    fn points(&self) -> &[HookPoint] {
        &[HookPoint::FieldPrompted]
    }

    async fn on_event(&self, _ctx: &HookContext) -> Result<(), HookError> {
        Err(HookError::Failed("something broke".into()))
    }
}

#[tokio::test]
async fn hook_error_does_not_stop_pipeline() {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));

    let registry = HookRegistry::new()
        .with(Arc::new(ErroringHook))
        .with(named("after-error", &log));

    let completed = registry.dispatch(&ctx(HookPoint::FieldPrompted)).await;

    assert_eq!(completed, 1);
    let log = log.lock().unwrap();
    assert_eq!(*log, vec!["after-error"]);
}

// --- Context passthrough ---

struct ValueCapture {
    seen: std::sync::Mutex<Option<serde_json::Value>>,
}

#[async_trait::async_trait]
impl Hook for ValueCapture {
    fn points(&self) -> &[HookPoint] {
        &[HookPoint::FieldAccepted]
    }

    async fn on_event(&self, ctx: &HookContext) -> Result<(), HookError> {
        *self.seen.lock().unwrap() = ctx.value.clone();
        Ok(())
    }
}

#[tokio::test]
async fn hooks_see_accepted_value() {
    let capture = Arc::new(ValueCapture {
        seen: std::sync::Mutex::new(None),
    });
    let registry = HookRegistry::new().with(capture.clone());

    let event = ctx(HookPoint::FieldAccepted)
        .with_field("age", 1)
        .with_value(serde_json::json!(30));
    registry.dispatch(&event).await;

    assert_eq!(*capture.seen.lock().unwrap(), Some(serde_json::json!(30)));
}

#[tokio::test]
async fn cloned_registry_shares_hooks() {
    let hook = Arc::new(RecordingHook::new());
    let registry = HookRegistry::new().with(hook.clone());
    let copy = registry.clone();

    registry.dispatch(&ctx(HookPoint::FormStarted)).await;
    copy.dispatch(&ctx(HookPoint::SessionCleared)).await;

    assert_eq!(
        hook.points_seen(),
        vec![HookPoint::FormStarted, HookPoint::SessionCleared]
    );
}
