//! AI adapters - LLM-backed extraction and off-track answering.

mod mock_extractor;
mod openai_client;
mod openai_extractor;
mod openai_responder;

pub use mock_extractor::MockFieldExtractor;
pub use openai_client::{OpenAiClient, OpenAiClientError, OpenAiConfig};
pub use openai_extractor::OpenAiFieldExtractor;
pub use openai_responder::OpenAiOffTrackResponder;
