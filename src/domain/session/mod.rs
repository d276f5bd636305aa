//! Session domain - the applicant interview aggregate.
//!
//! A session owns the interview stage, the accumulated answer bag, and the
//! final evaluation once the interview completes. Sessions are value-like
//! and serde round-trip through the session store unchanged.

mod aggregate;
mod answers;

pub use aggregate::Session;
pub use answers::{
    AnswerBag, AnsweredField, FieldName, FieldValue, Provenance, ACCEPTANCE_CONFIDENCE,
};
