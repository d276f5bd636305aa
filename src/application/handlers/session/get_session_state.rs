//! GetSessionStateHandler - reads a session's current interview state.

use std::sync::Arc;

use crate::domain::conversation::InterviewStage;
use crate::domain::evaluation::Evaluation;
use crate::domain::foundation::SessionId;
use crate::domain::session::AnswerBag;
use crate::ports::{SessionStore, SessionStoreError};

/// View of a session's interview state.
#[derive(Debug, Clone)]
pub struct SessionStateView {
    pub session_id: SessionId,
    pub stage: InterviewStage,
    pub pending_question: Option<String>,
    pub answers: AnswerBag,
    pub is_complete: bool,
    pub evaluation: Option<Evaluation>,
}

/// Errors for session queries.
#[derive(Debug, thiserror::Error)]
pub enum SessionQueryError {
    #[error("session {0} not found")]
    NotFound(SessionId),

    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// Handler for reading session state.
pub struct GetSessionStateHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionStateHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, id: SessionId) -> Result<SessionStateView, SessionQueryError> {
        let session = self
            .store
            .load(id)
            .await?
            .ok_or(SessionQueryError::NotFound(id))?;

        let stage = session.stage();
        let pending_question = stage
            .is_question()
            .then(|| stage.question().to_string());

        Ok(SessionStateView {
            session_id: id,
            stage,
            pending_question,
            answers: session.answers().clone(),
            is_complete: session.is_complete(),
            evaluation: session.evaluation().cloned(),
        })
    }
}
