//! Turn engine - advances one interview turn.
//!
//! Pure and transactional: all work happens on staged copies of the answer
//! bag and is committed to the session only when the turn succeeds. An
//! off-track turn, an ambiguous country, or a completed session never
//! mutates anything.

use crate::domain::evaluation::{build_narrative, normalize_answers, score_features, Evaluation};
use crate::domain::session::{FieldName, FieldValue, Session};

use super::countries::{is_unsupported_destination, match_supported_country};
use super::off_track::{self, OffTrackCategory};
use super::parsing::{self, LIGHT_PARSE_CONFIDENCE};
use super::planner::{next_step, PlannedStep};
use super::stage::InterviewStage;

/// A field candidate produced by the NL extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCandidate {
    pub name: FieldName,
    pub value: FieldValue,
    pub confidence: f64,
}

/// The result of processing one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The utterance was an aside; the session was not touched.
    ///
    /// `reply` carries the canned FAQ answer when one matched; `None` means
    /// the caller should consult the LLM responder (or fall back to the
    /// generic redirect) before replying.
    OffTrack {
        category: OffTrackCategory,
        reply: Option<String>,
        pending_question: String,
    },

    /// The interview advanced (or re-asked) and expects another turn.
    Advanced {
        stage: InterviewStage,
        message: String,
    },

    /// The interview finished this turn; the evaluation is stored on the
    /// session and `message` carries the narrative.
    Completed {
        message: String,
        evaluation: Evaluation,
    },
}

impl TurnOutcome {
    /// Returns true if this outcome finished the interview.
    pub fn is_complete(&self) -> bool {
        matches!(self, TurnOutcome::Completed { .. })
    }
}

/// Processes one applicant turn against the session.
///
/// Steps, in order: off-track short-circuit, candidate merge (honoring the
/// acceptance invariant), light-parse fallback for the pending field,
/// destination gating, planning, and - when every required field is
/// answered - the evaluation pipeline. `current_year` anchors recency
/// computations.
pub fn process_turn(
    session: &mut Session,
    utterance: &str,
    candidates: &[FieldCandidate],
    current_year: i64,
) -> TurnOutcome {
    let stage = session.stage();

    if stage == InterviewStage::Complete {
        return TurnOutcome::Advanced {
            stage,
            message: stage.question().to_string(),
        };
    }

    if let Some(category) = off_track::classify(utterance, stage) {
        let pending_question = stage.question().to_string();
        let reply = off_track::canned_response(utterance, category, &pending_question);
        tracing::debug!(
            session_id = %session.id(),
            category = category.as_str(),
            canned = reply.is_some(),
            "utterance classified off-track"
        );
        return TurnOutcome::OffTrack {
            category,
            reply,
            pending_question,
        };
    }

    // Stage all writes on a copy; nothing is committed until the turn
    // resolves.
    let mut answers = session.answers().clone();

    for candidate in candidates {
        answers.merge_candidate(candidate.name, candidate.value.clone(), candidate.confidence);
    }

    match stage {
        InterviewStage::AskCountry => {
            if !answers.contains(FieldName::Country) {
                match gate_destination(utterance) {
                    Gate::Supported(country) => {
                        answers.record_direct(FieldName::Country, FieldValue::Text(country), 1.0);
                    }
                    Gate::Unsupported => {
                        session.commit_turn(InterviewStage::CountryNotSupported, answers);
                        return TurnOutcome::Advanced {
                            stage: InterviewStage::CountryNotSupported,
                            message: InterviewStage::CountryNotSupported.question().to_string(),
                        };
                    }
                    Gate::Ambiguous => {
                        // Deliberately non-advancing: scoring must never run
                        // against an unknown destination.
                        session.commit_turn(InterviewStage::AskCountry, answers);
                        return TurnOutcome::Advanced {
                            stage: InterviewStage::AskCountry,
                            message: format!(
                                "I didn't recognize that as a Schengen destination. {}",
                                InterviewStage::AskCountry.question()
                            ),
                        };
                    }
                }
            }
        }
        InterviewStage::CountryNotSupported => {
            return match parsing::parse_yes_no(utterance) {
                Some(true) => {
                    session.commit_turn(InterviewStage::AskCountry, answers);
                    TurnOutcome::Advanced {
                        stage: InterviewStage::AskCountry,
                        message: format!("Great! {}", InterviewStage::AskCountry.question()),
                    }
                }
                Some(false) => {
                    session.commit_turn(InterviewStage::Complete, answers);
                    TurnOutcome::Advanced {
                        stage: InterviewStage::Complete,
                        message: "Understood. We currently assess Schengen destinations only; \
                                  feel free to come back any time."
                            .to_string(),
                    }
                }
                None => TurnOutcome::Advanced {
                    stage: InterviewStage::CountryNotSupported,
                    message: InterviewStage::CountryNotSupported.question().to_string(),
                },
            };
        }
        _ => {
            // Guarantee forward progress: if the pending field is still
            // unanswered after the merge, keep the applicant's own words.
            if let Some(expected) = stage.expected_field() {
                if !answers.contains(expected) {
                    for (name, value) in parsing::fallback_answers(stage, utterance) {
                        answers.record_direct(name, value, LIGHT_PARSE_CONFIDENCE);
                    }
                }
            }
        }
    }

    match next_step(&answers) {
        PlannedStep::Ask(next_stage) => {
            let message = next_stage.question().to_string();
            session.commit_turn(next_stage, answers);
            TurnOutcome::Advanced {
                stage: next_stage,
                message,
            }
        }
        PlannedStep::Evaluate => {
            let features = normalize_answers(&answers, current_year);
            let evaluation = score_features(&features);
            let message = build_narrative(&evaluation, &answers);
            tracing::info!(
                session_id = %session.id(),
                success_ratio = evaluation.success_ratio,
                confidence = evaluation.confidence,
                "interview complete"
            );
            session.complete_with(answers, evaluation.clone());
            TurnOutcome::Completed {
                message,
                evaluation,
            }
        }
    }
}

enum Gate {
    Supported(String),
    Unsupported,
    Ambiguous,
}

fn gate_destination(utterance: &str) -> Gate {
    if let Some(country) = match_supported_country(utterance) {
        return Gate::Supported(country);
    }
    if is_unsupported_destination(utterance) {
        return Gate::Unsupported;
    }
    Gate::Ambiguous
}
