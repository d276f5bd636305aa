//! HTTP handlers for the chat endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::chat::{ChatError, ProcessTurnCommand, ProcessTurnHandler};
use crate::domain::foundation::SessionId;

use super::dto::{ChatRequest, ChatResponse, ErrorResponse};

/// Shared state for chat routes.
#[derive(Clone)]
pub struct ChatHandlers {
    process_turn: Arc<ProcessTurnHandler>,
}

impl ChatHandlers {
    pub fn new(process_turn: Arc<ProcessTurnHandler>) -> Self {
        Self { process_turn }
    }
}

/// POST /api/chat - process one applicant message.
pub async fn chat(State(handlers): State<ChatHandlers>, Json(req): Json<ChatRequest>) -> Response {
    let session_id = match req.session_id.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<SessionId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new("Invalid session ID")),
                )
                    .into_response()
            }
        },
    };

    let cmd = ProcessTurnCommand {
        session_id,
        message: req.message,
    };

    match handlers.process_turn.handle(cmd).await {
        Ok(result) => {
            let response: ChatResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(ChatError::Store(error)) => {
            tracing::error!(%error, "session store failed during turn");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Session storage unavailable")),
            )
                .into_response()
        }
    }
}
