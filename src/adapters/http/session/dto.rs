//! HTTP DTOs for session endpoints.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::adapters::http::chat::{answers_to_map, stage_name};
use crate::application::handlers::session::SessionStateView;
use crate::domain::evaluation::Evaluation;
use crate::domain::session::Session;

/// Session state for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStateResponse {
    pub session_id: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_question: Option<String>,
    pub answers: Map<String, Value>,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

impl From<SessionStateView> for SessionStateResponse {
    fn from(view: SessionStateView) -> Self {
        Self {
            session_id: view.session_id.to_string(),
            state: stage_name(&view.stage),
            pending_question: view.pending_question,
            answers: answers_to_map(&view.answers),
            is_complete: view.is_complete,
            evaluation: view.evaluation,
        }
    }
}

/// Response for a session reset.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub session_id: String,
    pub message: String,
    pub state: String,
}

impl ResetResponse {
    pub fn for_session(session: &Session) -> Self {
        Self {
            session_id: session.id().to_string(),
            message: "Session reset successfully. You can start a new visa evaluation."
                .to_string(),
            state: stage_name(&session.stage()),
        }
    }
}
