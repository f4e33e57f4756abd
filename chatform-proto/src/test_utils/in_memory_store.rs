//! HashMap-backed SessionStore for testing.

use crate::error::StateError;
use crate::session::{SessionKey, SessionState};
use crate::store::SessionStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory session store backed by a `HashMap` behind a `RwLock`.
pub struct InMemorySessionStore {
    data: RwLock<HashMap<SessionKey, SessionState>>,
}

impl InMemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Number of conversations with stored state.
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or_default()
    }

    /// Whether no conversation has stored state.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn read(&self, key: &SessionKey) -> Result<Option<SessionState>, StateError> {
        let data = self
            .data
            .read()
            .map_err(|e| StateError::Other(e.to_string().into()))?;
        Ok(data.get(key).cloned())
    }

    async fn write(&self, key: &SessionKey, state: SessionState) -> Result<(), StateError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StateError::WriteFailed(e.to_string()))?;
        data.insert(key.clone(), state);
        Ok(())
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), StateError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StateError::WriteFailed(e.to_string()))?;
        data.remove(key);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SessionKey>, StateError> {
        let data = self
            .data
            .read()
            .map_err(|e| StateError::Other(e.to_string().into()))?;
        Ok(data.keys().cloned().collect())
    }
}
