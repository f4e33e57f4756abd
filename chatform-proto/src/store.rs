//! Where conversation state lives between messages.

use crate::{error::StateError, session::SessionKey, session::SessionState};
use async_trait::async_trait;

/// Persists [`SessionState`] per conversation.
///
/// Implementations:
/// - InMemorySessionStore: std `RwLock` (testing, behind `test-utils`)
/// - MemoryStore: tokio `RwLock` (single process)
/// - FsStore: one JSON file per conversation (survives restarts)
///
/// The trait is deliberately minimal: read, write, delete, list.
/// Serializing concurrent messages for one conversation is the engine's
/// job (it holds a per-key lock across read-modify-write). A store shared
/// by several processes must provide its own atomic read-modify-write.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the state of a conversation. `None` means idle.
    async fn read(&self, key: &SessionKey) -> Result<Option<SessionState>, StateError>;

    /// Write the state of a conversation. Creates or overwrites.
    async fn write(&self, key: &SessionKey, state: SessionState) -> Result<(), StateError>;

    /// Drop the state of a conversation, returning it to idle.
    /// No-op if nothing is stored.
    async fn delete(&self, key: &SessionKey) -> Result<(), StateError>;

    /// Every conversation that currently has state.
    async fn list(&self) -> Result<Vec<SessionKey>, StateError>;
}
