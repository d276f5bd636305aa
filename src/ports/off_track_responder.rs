//! Off-Track Responder Port - LLM fallback for unanswerable asides.
//!
//! When an off-track question matches no canned FAQ entry, this collaborator
//! may produce a free-form answer. It is strictly optional: the engine has a
//! generic redirect for when the responder is absent, slow, or failing.

use async_trait::async_trait;

use crate::domain::conversation::OffTrackCategory;

/// Responder errors. Always recoverable; the caller falls back to the
/// generic redirect.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("responder unavailable: {0}")]
    Unavailable(String),

    #[error("responder timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Port for answering off-track questions with an LLM.
#[async_trait]
pub trait OffTrackResponder: Send + Sync {
    /// Answers an off-track utterance.
    ///
    /// `pending_question` is the interview question the reply must steer the
    /// applicant back to; implementations should end their answer with it.
    async fn answer(
        &self,
        utterance: &str,
        category: OffTrackCategory,
        pending_question: &str,
    ) -> Result<String, ResponderError>;
}
