//! Field Extractor Port - interface for NL field extraction.
//!
//! Implementations turn a free-text utterance into structured field
//! candidates with confidences. Extraction is best-effort by contract: the
//! engine tolerates empty results and failures alike, degrading to its own
//! light parsing, so an adapter outage can never stall a conversation.

use async_trait::async_trait;

use crate::domain::conversation::{FieldCandidate, InterviewStage};

/// Extraction errors.
///
/// All variants are recoverable from the caller's perspective; they are
/// logged and the turn proceeds without extracted candidates.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// The extraction service could not be reached or returned an error.
    #[error("extractor unavailable: {0}")]
    Unavailable(String),

    /// The extraction call exceeded its deadline.
    #[error("extraction timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The service responded with something unparseable.
    #[error("malformed extractor response: {0}")]
    MalformedResponse(String),
}

/// Port for extracting structured field candidates from an utterance.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extracts field candidates from the utterance.
    ///
    /// `stage` tells the extractor which question the applicant is
    /// answering, which sharpens the extraction prompt. An empty vector is a
    /// valid result.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError` on transport or parse failures; callers must
    /// treat this as "no candidates", never as a turn failure.
    async fn extract(
        &self,
        stage: InterviewStage,
        utterance: &str,
    ) -> Result<Vec<FieldCandidate>, ExtractorError>;
}
