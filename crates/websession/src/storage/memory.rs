//! In-memory session store.

use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use websession_core::{SessionId, SessionPayload, SessionStore, StoreError};

/// In-memory store implementation.
///
/// Useful for tests and single-process deployments.
/// Data is lost on restart.
pub struct MemoryStore {
    sessions: RwLock<HashMap<SessionId, SessionPayload>>,
}

impl MemoryStore {
    /// Create a new in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn put(&self, id: SessionId, payload: SessionPayload) -> Result<(), StoreError> {
        self.sessions
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?
            .insert(id, payload);

        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<SessionPayload>, StoreError> {
        Ok(self
            .sessions
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?
            .get(&id)
            .cloned())
    }

    async fn del(&self, id: SessionId) -> Result<(), StoreError> {
        self.sessions
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?
            .remove(&id);

        Ok(())
    }
}
