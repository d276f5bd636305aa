//! Per-session turn serialization.
//!
//! A session's answer bag and stage are not safe for concurrent mutation,
//! so turns for one session id must run strictly one at a time. Different
//! sessions share nothing and proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::SessionId;

/// Registry of one async mutex per live session.
#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    locks: Arc<Mutex<HashMap<SessionId, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex guarding the given session, creating it on first
    /// use. Callers hold the returned lock for the duration of a turn.
    pub async fn for_session(&self, id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(id).or_default().clone()
    }

    /// Drops the lock entry for a session (after deletion or reset).
    pub async fn forget(&self, id: SessionId) {
        self.locks.lock().await.remove(&id);
    }
}
