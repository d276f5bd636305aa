//! HTTP adapters - REST API over the application handlers.

pub mod chat;
mod health;
pub mod session;

use axum::routing::get;
use axum::Router;

pub use chat::ChatHandlers;
pub use session::SessionHandlers;

/// Assembles the full API router.
pub fn api_router(chat: ChatHandlers, sessions: SessionHandlers) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/chat", chat::chat_routes(chat))
        .nest("/api/sessions", session::session_routes(sessions))
}
