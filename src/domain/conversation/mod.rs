//! Conversation domain - the interview state machine.
//!
//! The interview walks a fixed question sequence with two branch points
//! (business vs. job holder, travel vs. no travel) and several conditional
//! skips. Everything in this module is pure and synchronous; collaborator
//! calls (extraction, LLM fallback) happen in the application layer around
//! the engine.

mod countries;
mod engine;
mod off_track;
mod parsing;
mod planner;
mod stage;

pub use countries::{
    is_heavy_visa_country, is_schengen_country, is_unsupported_destination,
    match_supported_country,
};
pub use engine::{process_turn, FieldCandidate, TurnOutcome};
pub use off_track::{canned_response, classify, compose_redirect, generic_redirect, OffTrackCategory};
pub use parsing::{parse_first_number, parse_four_digit_year, parse_yes_no};
pub use planner::{next_step, PlannedStep};
pub use stage::InterviewStage;
