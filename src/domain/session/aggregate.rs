//! Session aggregate entity.
//!
//! A session is the unit of conversation state: one applicant working
//! through the interview. The turn engine is the only writer; stores and
//! transports treat the aggregate as an opaque serde value.
//!
//! # Invariants
//!
//! - `evaluation` is set exactly once, when the interview completes
//! - a reset returns the session to the initial stage with an empty bag

use serde::{Deserialize, Serialize};

use crate::domain::conversation::InterviewStage;
use crate::domain::evaluation::Evaluation;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::AnswerBag;

/// Session aggregate - one applicant's interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// The question currently being asked (or a terminal stage).
    stage: InterviewStage,

    /// Facts collected so far.
    answers: AnswerBag,

    /// Final assessment, present once the interview completes.
    evaluation: Option<Evaluation>,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session last changed.
    updated_at: Timestamp,
}

impl Session {
    /// Creates a new session at the initial interview stage.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            stage: InterviewStage::initial(),
            answers: AnswerBag::new(),
            evaluation: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Returns the session ID.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the current interview stage.
    pub fn stage(&self) -> InterviewStage {
        self.stage
    }

    /// Returns the collected answers.
    pub fn answers(&self) -> &AnswerBag {
        &self.answers
    }

    /// Returns the evaluation, if the interview has completed.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref()
    }

    /// Returns true if the interview reached its terminal stage.
    pub fn is_complete(&self) -> bool {
        self.stage == InterviewStage::Complete
    }

    /// Returns when the session was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the session last changed.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutators (turn engine only)
    // ─────────────────────────────────────────────────────────────────────

    /// Replaces the session's stage and answers in one committed step.
    ///
    /// The turn engine stages its work on copies and commits here, so a
    /// failed turn never leaves a partially-written session behind.
    pub fn commit_turn(&mut self, stage: InterviewStage, answers: AnswerBag) {
        self.stage = stage;
        self.answers = answers;
        self.updated_at = Timestamp::now();
    }

    /// Stores the final evaluation and marks the interview complete.
    pub fn complete_with(&mut self, answers: AnswerBag, evaluation: Evaluation) {
        self.answers = answers;
        self.evaluation = Some(evaluation);
        self.stage = InterviewStage::Complete;
        self.updated_at = Timestamp::now();
    }

    /// Clears the session back to the initial stage.
    pub fn reset(&mut self) {
        self.stage = InterviewStage::initial();
        self.answers.clear();
        self.evaluation = None;
        self.updated_at = Timestamp::now();
    }
}
