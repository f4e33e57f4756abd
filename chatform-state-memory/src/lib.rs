#![deny(missing_docs)]
//! In-memory implementation of chatform's SessionStore trait.
//!
//! Uses a `HashMap` keyed by [`SessionKey`] behind a tokio `RwLock`.
//! Sessions live as long as the process does.

use async_trait::async_trait;
use chatform_proto::error::StateError;
use chatform_proto::session::{SessionKey, SessionState};
use chatform_proto::store::SessionStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory session store.
///
/// Suitable for tests, prototypes, and single-process bots that can
/// afford to lose half-filled forms on restart.
pub struct MemoryStore {
    data: RwLock<HashMap<SessionKey, SessionState>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Drop every session.
    pub async fn clear(&self) {
        self.data.write().await.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn read(&self, key: &SessionKey) -> Result<Option<SessionState>, StateError> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn write(&self, key: &SessionKey, state: SessionState) -> Result<(), StateError> {
        let mut data = self.data.write().await;
        data.insert(key.clone(), state);
        Ok(())
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StateError> {
        let mut data = self.data.write().await;
        data.remove(key);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionKey>, StateError> {
        let data = self.data.read().await;
        Ok(data.keys().cloned().collect())
    }
}
