//! ResetSessionHandler - clears a session back to the initial stage.

use std::sync::Arc;

use crate::application::SessionLocks;
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionStore, SessionStoreError};

/// Handler for resetting sessions.
pub struct ResetSessionHandler {
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
}

impl ResetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>, locks: SessionLocks) -> Self {
        Self { store, locks }
    }

    /// Resets the session, returning the fresh state.
    ///
    /// Resetting an unknown id creates a new session under that id, so a
    /// client can always recover a conversation.
    pub async fn handle(&self, id: SessionId) -> Result<Session, SessionStoreError> {
        let lock = self.locks.for_session(id).await;
        let _turn_guard = lock.lock().await;

        let mut session = match self.store.load(id).await? {
            Some(session) => session,
            None => Session::new(id),
        };
        session.reset();
        self.store.save(&session).await?;

        tracing::info!(session_id = %id, "session reset to initial stage");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::conversation::InterviewStage;
    use crate::domain::session::FieldName;

    #[tokio::test]
    async fn reset_clears_answers_and_returns_to_start() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = Session::new(SessionId::new());
        let mut answers = session.answers().clone();
        answers.record_direct(FieldName::Country, "Germany".into(), 1.0);
        session.commit_turn(InterviewStage::AskProfession, answers);
        store.save(&session).await.unwrap();

        let handler = ResetSessionHandler::new(store.clone(), SessionLocks::new());
        let fresh = handler.handle(*session.id()).await.unwrap();

        assert_eq!(fresh.stage(), InterviewStage::AskCountry);
        assert!(fresh.answers().is_empty());

        let stored = store.load(*session.id()).await.unwrap().unwrap();
        assert!(stored.answers().is_empty());
    }

    #[tokio::test]
    async fn resetting_an_unknown_session_creates_one() {
        let store = Arc::new(InMemorySessionStore::new());
        let handler = ResetSessionHandler::new(store.clone(), SessionLocks::new());

        let id = SessionId::new();
        let fresh = handler.handle(id).await.unwrap();

        assert_eq!(fresh.id(), &id);
        assert_eq!(store.session_count().await, 1);
    }
}
