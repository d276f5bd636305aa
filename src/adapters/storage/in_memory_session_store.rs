//! In-Memory Session Store Adapter
//!
//! Stores sessions in a process-local map. Useful for testing and
//! development; sessions do not survive a restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for interview sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all stored sessions (useful for tests).
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Returns the number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(&id);
        Ok(())
    }
}
