//! Acceptance tests for the protocol crate.
//!
//! Tests cover:
//! - Trait object safety (Box<dyn Trait> is Send + Sync)
//! - Typed ID conversions
//! - Message and content helpers
//! - Session state transitions and their stored shape
//! - Context bag narrowing

use chatform_proto::*;
use serde_json::json;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Object Safety: Box<dyn Trait> compiles and is Send + Sync
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn _assert_send_sync<T: Send + Sync>() {}

#[test]
fn session_store_is_object_safe_send_sync() {
    _assert_send_sync::<Box<dyn SessionStore>>();
    _assert_send_sync::<std::sync::Arc<dyn SessionStore>>();
}

#[test]
fn transport_is_object_safe_send_sync() {
    _assert_send_sync::<Box<dyn Transport>>();
    _assert_send_sync::<std::sync::Arc<dyn Transport>>();
}

#[test]
fn hook_is_object_safe_send_sync() {
    _assert_send_sync::<Box<dyn Hook>>();
}

#[test]
fn context_bag_is_send_sync() {
    _assert_send_sync::<ContextBag>();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Typed ID conversions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn chat_id_from_str() {
    let id = ChatId::from("chat-1");
    assert_eq!(id.as_str(), "chat-1");
    assert_eq!(id.to_string(), "chat-1");
}

#[test]
fn user_id_from_platform_integer() {
    let id = UserId::from(-100_123_i64);
    assert_eq!(id.as_str(), "-100123");
}

#[test]
fn group_chat_id_borrows_as_str() {
    fn path_component(id: impl AsRef<str>) -> String {
        id.as_ref().to_owned()
    }
    let id = ChatId::from(-100_500_i64);
    assert_eq!(path_component(&id), "-100500");
    assert_eq!(serde_json::from_value::<ChatId>(json!("-100500")).unwrap(), id);
}

#[test]
fn form_id_serializes_as_plain_string() {
    let id = FormId::new("signup");
    assert_eq!(serde_json::to_value(&id).unwrap(), json!("signup"));
}

#[test]
fn attachment_kind_constants() {
    assert_eq!(AttachmentKind::photo().as_str(), "photo");
    assert_eq!(AttachmentKind::document().as_str(), "document");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Messages and content
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn message_text_helper_sets_sender_and_text() {
    let msg = Message::text("c1", "u1", "hello");
    assert_eq!(msg.text.as_deref(), Some("hello"));
    assert_eq!(msg.key(), SessionKey::new("c1", "u1"));
    assert!(msg.attachments.is_empty());
}

#[test]
fn message_finds_attachment_by_kind() {
    let msg = Message::new("c1", "u1")
        .with_attachment(Attachment::document(json!({"file_id": "doc-1"})))
        .with_attachment(Attachment::photo(json!([{"file_id": "small"}])));

    let photo = msg.attachment(&AttachmentKind::photo()).unwrap();
    assert_eq!(photo.payload, json!([{"file_id": "small"}]));
    assert!(msg.attachment(&AttachmentKind::new("voice")).is_none());
}

#[test]
fn message_omits_empty_fields_when_serialized() {
    let msg = Message::text("c1", "u1", "hi");
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value, json!({"chat_id": "c1", "user_id": "u1", "text": "hi"}));
}

#[test]
fn content_blocks_as_text_skips_media() {
    let c = Content::Blocks(vec![
        ContentBlock::Media {
            kind: AttachmentKind::photo(),
            source: "file-1".into(),
            caption: None,
        },
        ContentBlock::Text {
            text: "Pick one".into(),
        },
    ]);
    assert_eq!(c.as_text(), Some("Pick one"));
}

#[test]
fn content_text_serializes_untagged() {
    let c = Content::from("What is your name?");
    assert_eq!(serde_json::to_value(&c).unwrap(), json!("What is your name?"));
}

#[test]
fn decoration_is_transparent() {
    let d = Decoration::new(json!({"keyboard": [["Yes", "No"]]}));
    assert_eq!(
        serde_json::to_value(&d).unwrap(),
        json!({"keyboard": [["Yes", "No"]]})
    );
    assert_eq!(d.payload()["keyboard"][0][1], json!("No"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn new_session_awaits_first_field() {
    let state = SessionState::new("signup");
    assert_eq!(state.slot, Slot::Awaiting(0));
    assert_eq!(state.slot_index(), Some(0));
    assert!(state.collected.is_empty());
    assert_eq!(Phase::of(Some(&state)), Phase::AwaitingField(0));
}

#[test]
fn accept_advances_one_slot_at_a_time() {
    let mut state = SessionState::new("signup");
    assert_eq!(state.accept("name", json!("Ann"), 3), Slot::Awaiting(1));
    assert_eq!(state.accept("age", json!(30), 3), Slot::Awaiting(2));
    assert_eq!(state.accept("city", json!("Oslo"), 3), Slot::Completed);
    assert!(state.is_completed());
    assert_eq!(state.value("age"), Some(&json!(30)));
    let names: Vec<&str> = state.collected.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["name", "age", "city"]);
}

#[test]
fn accept_on_completed_session_is_a_no_op() {
    let mut state = SessionState::new("one");
    state.accept("only", json!(1), 1);
    assert_eq!(state.accept("extra", json!(2), 1), Slot::Completed);
    assert_eq!(state.collected.len(), 1);
}

#[test]
fn phase_of_missing_state_is_idle() {
    assert_eq!(Phase::of(None), Phase::Idle);
}

#[test]
fn session_state_stored_shape() {
    let mut state = SessionState::new("signup");
    state.accept("name", json!("Ann"), 2);
    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(
        value,
        json!({
            "form": "signup",
            "slot": {"state": "awaiting", "index": 1},
            "collected": [{"name": "name", "value": "Ann"}]
        })
    );
    let back: SessionState = serde_json::from_value(value).unwrap();
    assert_eq!(back, state);
}

#[test]
fn completed_slot_has_no_index() {
    let value = serde_json::to_value(Slot::Completed).unwrap();
    assert_eq!(value, json!({"state": "completed"}));
}

#[test]
fn session_key_display() {
    assert_eq!(SessionKey::new("c1", "u9").to_string(), "c1/u9");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Context bag
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn context_bag_typed_lookup() {
    let bag = ContextBag::new().with("locale", "en".to_string()).with("retries", 3u32);
    assert_eq!(bag.get::<String>("locale").map(String::as_str), Some("en"));
    assert_eq!(bag.get::<u32>("retries"), Some(&3));
    // Wrong type is a miss, not a panic.
    assert_eq!(bag.get::<u64>("retries"), None);
    assert!(bag.contains("retries"));
    assert_eq!(bag.len(), 2);
}

#[test]
fn context_bag_select_narrows_keys() {
    let bag = ContextBag::new()
        .with("db", "pool".to_string())
        .with("secret", "hunter2".to_string());
    let narrowed = bag.select(["db"]).unwrap();
    assert!(narrowed.contains("db"));
    assert!(!narrowed.contains("secret"));
}

#[test]
fn context_bag_select_reports_missing_key() {
    let bag = ContextBag::new().with("db", 1u8);
    let err = bag.select(["db", "mailer"]).unwrap_err();
    assert_eq!(err, "mailer");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test]
fn error_messages() {
    assert_eq!(
        TransportError::SendFailed("timeout".into()).to_string(),
        "send failed: timeout"
    );
    assert_eq!(
        HandlerError::MissingContext("db".into()).to_string(),
        "missing context key: db"
    );
    assert_eq!(
        StateError::Serialization("bad json".into()).to_string(),
        "serialization error: bad json"
    );
}

#[test]
fn hook_context_builder() {
    let ctx = HookContext::new(
        HookPoint::FieldAccepted,
        SessionKey::new("c", "u"),
        FormId::new("f"),
    )
    .with_field("age", 1)
    .with_value(json!(30));
    assert_eq!(ctx.field.as_deref(), Some("age"));
    assert_eq!(ctx.slot, Some(1));
    assert_eq!(ctx.value, Some(json!(30)));
}
