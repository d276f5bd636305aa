//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_session, reset_session, SessionHandlers};

/// Creates the session router.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/:id", get(get_session))
        .route("/:id/reset", post(reset_session))
        .with_state(handlers)
}
