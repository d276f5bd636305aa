//! Evaluation domain - deterministic scoring of a completed interview.
//!
//! Three pure, total transforms run in sequence once the planner decides the
//! interview is complete: the normalizer turns the raw answer bag into typed
//! features, the rubric turns features into a banded evaluation, and the
//! narrative builder renders the evaluation as applicant-facing text.
//! None of them can fail; unknown inputs degrade to unknown features and a
//! low-confidence result.

mod features;
mod narrative;
mod rubric;

pub use features::{
    normalize_answers, parse_travel_countries, profession_is_business, profession_is_job_holder,
    NormalizedFeatures,
};
pub use narrative::build_narrative;
pub use rubric::{score_features, ConfidenceLabel, Evaluation};
