//! Mock field extractor for tests and offline development.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::conversation::{FieldCandidate, InterviewStage};
use crate::ports::{ExtractorError, FieldExtractor};

/// Scripted extractor: returns queued candidate batches in order, then
/// empty results. Can be switched to fail every call.
#[derive(Debug, Default)]
pub struct MockFieldExtractor {
    batches: Mutex<VecDeque<Vec<FieldCandidate>>>,
    fail: bool,
}

impl MockFieldExtractor {
    /// Creates an extractor that always returns no candidates.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Creates an extractor that fails every call.
    pub fn failing() -> Self {
        Self {
            batches: Mutex::new(VecDeque::new()),
            fail: true,
        }
    }

    /// Queues a batch of candidates for the next call.
    pub fn enqueue(&self, candidates: Vec<FieldCandidate>) {
        self.batches.lock().unwrap().push_back(candidates);
    }
}

#[async_trait]
impl FieldExtractor for MockFieldExtractor {
    async fn extract(
        &self,
        _stage: InterviewStage,
        _utterance: &str,
    ) -> Result<Vec<FieldCandidate>, ExtractorError> {
        if self.fail {
            return Err(ExtractorError::Unavailable("mock failure".to_string()));
        }
        Ok(self
            .batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}
