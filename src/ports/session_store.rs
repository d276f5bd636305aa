//! Session Store Port - interface for persisting sessions.
//!
//! The store is an opaque key-value mapping from session id to the full
//! serialized session. TTL policy belongs to the adapter; the core neither
//! sets nor inspects expiry.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("failed to serialize session {0}")]
    SerializationFailed(SessionId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Port for persisting and loading interview sessions.
///
/// A stored session that no longer deserializes (schema drift, corrupted
/// payload) is reported as absent rather than as an error, so callers
/// restart the interview instead of failing the turn.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by id. `Ok(None)` means unknown or unreadable.
    async fn load(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Saves the full session state.
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Removes a session. Deleting an unknown id is not an error.
    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError>;
}
