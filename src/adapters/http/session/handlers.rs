//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::chat::ErrorResponse;
use crate::application::handlers::session::{
    GetSessionStateHandler, ResetSessionHandler, SessionQueryError,
};
use crate::domain::foundation::SessionId;

use super::dto::{ResetResponse, SessionStateResponse};

/// Shared state for session routes.
#[derive(Clone)]
pub struct SessionHandlers {
    get_handler: Arc<GetSessionStateHandler>,
    reset_handler: Arc<ResetSessionHandler>,
}

impl SessionHandlers {
    pub fn new(
        get_handler: Arc<GetSessionStateHandler>,
        reset_handler: Arc<ResetSessionHandler>,
    ) -> Self {
        Self {
            get_handler,
            reset_handler,
        }
    }
}

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid session ID")),
        )
            .into_response()
    })
}

/// GET /api/sessions/:id - current state, pending question, answers.
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(session_id).await {
        Ok(view) => {
            let response: SessionStateResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(SessionQueryError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Session not found")),
        )
            .into_response(),
        Err(SessionQueryError::Store(error)) => {
            tracing::error!(%error, "session store failed during query");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Session storage unavailable")),
            )
                .into_response()
        }
    }
}

/// POST /api/sessions/:id/reset - clear to the initial state.
pub async fn reset_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.reset_handler.handle(session_id).await {
        Ok(session) => (StatusCode::OK, Json(ResetResponse::for_session(&session))).into_response(),
        Err(error) => {
            tracing::error!(%error, "session store failed during reset");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::new("Session storage unavailable")),
            )
                .into_response()
        }
    }
}
