//! HTTP adapter for the chat endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChatRequest, ChatResponse, ErrorResponse};
pub(crate) use dto::{answers_to_map, stage_name};
pub use handlers::ChatHandlers;
pub use routes::chat_routes;
