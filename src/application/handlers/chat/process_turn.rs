//! ProcessTurnHandler - orchestrates one chat turn end to end.
//!
//! Load (or create) the session, gather extractor candidates, run the pure
//! engine, resolve off-track fallbacks, persist, reply. Collaborator
//! failures degrade; only store failures surface to the caller.

use std::sync::Arc;

use crate::application::SessionLocks;
use crate::domain::conversation::{
    generic_redirect, process_turn, FieldCandidate, InterviewStage, TurnOutcome,
};
use crate::domain::evaluation::Evaluation;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{AnswerBag, Session};
use crate::ports::{FieldExtractor, OffTrackResponder, SessionStore, SessionStoreError};

/// Command to process one applicant message.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    /// Existing session to continue, or `None` to start a new one.
    pub session_id: Option<SessionId>,
    pub message: String,
}

/// Result of a processed turn.
#[derive(Debug, Clone)]
pub struct ProcessTurnResult {
    pub session_id: SessionId,
    pub message: String,
    pub stage: InterviewStage,
    pub answers: AnswerBag,
    pub is_complete: bool,
    pub evaluation: Option<Evaluation>,
}

/// Errors surfaced to the transport layer.
///
/// Everything else (extractor outages, responder failures, malformed stored
/// fields) is recovered inside the handler.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// Handler for processing chat turns.
pub struct ProcessTurnHandler {
    store: Arc<dyn SessionStore>,
    extractor: Option<Arc<dyn FieldExtractor>>,
    responder: Option<Arc<dyn OffTrackResponder>>,
    locks: SessionLocks,
}

impl ProcessTurnHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        extractor: Option<Arc<dyn FieldExtractor>>,
        responder: Option<Arc<dyn OffTrackResponder>>,
        locks: SessionLocks,
    ) -> Self {
        Self {
            store,
            extractor,
            responder,
            locks,
        }
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<ProcessTurnResult, ChatError> {
        let session_id = cmd.session_id.unwrap_or_else(SessionId::new);

        // Serialize turns per session; different sessions proceed freely.
        let lock = self.locks.for_session(session_id).await;
        let _turn_guard = lock.lock().await;

        let (mut session, is_new) = match self.store.load(session_id).await? {
            Some(session) => (session, false),
            None => (Session::new(session_id), true),
        };

        // First contact: greet and pose the opening question without
        // consuming the applicant's message as an answer.
        if is_new {
            self.store.save(&session).await?;
            let message = format!(
                "Welcome! I'll ask a few questions to assess your Schengen visa \
                 eligibility. {}",
                session.stage().question()
            );
            return Ok(self.result(session, message));
        }

        let candidates = self.extract_candidates(session.stage(), &cmd.message).await;
        let current_year = i64::from(Timestamp::now().year());

        let outcome = process_turn(&mut session, &cmd.message, &candidates, current_year);

        match outcome {
            TurnOutcome::OffTrack {
                category,
                reply,
                pending_question,
            } => {
                // No state change to persist on an aside.
                let message = match reply {
                    Some(canned) => canned,
                    None => self.responder_reply(&cmd.message, category, &pending_question).await,
                };
                Ok(self.result(session, message))
            }
            TurnOutcome::Advanced { message, .. } => {
                self.store.save(&session).await?;
                Ok(self.result(session, message))
            }
            TurnOutcome::Completed { message, .. } => {
                self.store.save(&session).await?;
                Ok(self.result(session, message))
            }
        }
    }

    async fn extract_candidates(
        &self,
        stage: InterviewStage,
        message: &str,
    ) -> Vec<FieldCandidate> {
        let Some(extractor) = &self.extractor else {
            return Vec::new();
        };
        match extractor.extract(stage, message).await {
            Ok(candidates) => candidates,
            Err(error) => {
                // Extraction is best-effort; light parsing takes over.
                tracing::warn!(%error, "field extraction unavailable; using light parsing");
                Vec::new()
            }
        }
    }

    async fn responder_reply(
        &self,
        utterance: &str,
        category: crate::domain::conversation::OffTrackCategory,
        pending_question: &str,
    ) -> String {
        if let Some(responder) = &self.responder {
            match responder.answer(utterance, category, pending_question).await {
                Ok(answer) if answer.ends_with(pending_question) => return answer,
                Ok(answer) => {
                    return crate::domain::conversation::compose_redirect(
                        answer.trim(),
                        pending_question,
                    )
                }
                Err(error) => {
                    tracing::warn!(%error, "off-track responder failed; using generic redirect");
                }
            }
        }
        generic_redirect(pending_question)
    }

    fn result(&self, session: Session, message: String) -> ProcessTurnResult {
        ProcessTurnResult {
            session_id: *session.id(),
            message,
            stage: session.stage(),
            answers: session.answers().clone(),
            is_complete: session.is_complete(),
            evaluation: session.evaluation().cloned(),
        }
    }
}
