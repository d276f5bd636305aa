//! LLM-backed off-track responder.
//!
//! Answers asides that the canned FAQ catalog cannot, then steers the
//! applicant back to the pending question. The reply always ends with the
//! pending question, whatever the model produced.

use async_trait::async_trait;

use crate::domain::conversation::{compose_redirect, OffTrackCategory};
use crate::ports::{OffTrackResponder, ResponderError};

use super::openai_client::{OpenAiClient, OpenAiClientError};

const SYSTEM_PROMPT: &str = "You are a Schengen visa assistant. The applicant asked a side \
question in the middle of their eligibility interview. Answer it accurately in 2-4 \
sentences, without inventing embassy-specific facts, and do not ask any questions of \
your own.";

/// Off-track responder backed by an OpenAI-compatible completion API.
pub struct OpenAiOffTrackResponder {
    client: OpenAiClient,
}

impl OpenAiOffTrackResponder {
    /// Creates a responder over the given client.
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OffTrackResponder for OpenAiOffTrackResponder {
    async fn answer(
        &self,
        utterance: &str,
        category: OffTrackCategory,
        pending_question: &str,
    ) -> Result<String, ResponderError> {
        let user_prompt = format!("[topic: {}] {}", category.as_str(), utterance);

        let answer = self
            .client
            .complete(SYSTEM_PROMPT, &user_prompt, 0.3)
            .await
            .map_err(|e| match e {
                OpenAiClientError::Timeout { timeout_secs } => {
                    ResponderError::Timeout { timeout_secs }
                }
                other => ResponderError::Unavailable(other.to_string()),
            })?;

        Ok(compose_redirect(answer.trim(), pending_question))
    }
}
