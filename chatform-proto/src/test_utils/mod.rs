//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that prove the trait APIs are usable and let engine
//! tests inspect what was sent and stored.

mod in_memory_store;
mod recording_hook;
mod recording_transport;

pub use in_memory_store::InMemorySessionStore;
pub use recording_hook::{RecordedEvent, RecordingHook};
pub use recording_transport::{RecordingTransport, SentMessage};
