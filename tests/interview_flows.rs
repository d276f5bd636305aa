//! End-to-end interview flows against the application handlers.
//!
//! These mirror the conversation scripts the product actually sees: a full
//! business profile, a job holder, a no-travel applicant, off-track asides,
//! and the scoring caps.

use std::sync::Arc;

use visa_compass::adapters::storage::InMemorySessionStore;
use visa_compass::ports::SessionStore;
use visa_compass::application::handlers::chat::{
    ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult,
};
use visa_compass::application::handlers::session::{GetSessionStateHandler, ResetSessionHandler};
use visa_compass::application::SessionLocks;
use visa_compass::domain::conversation::InterviewStage;
use visa_compass::domain::foundation::SessionId;
use visa_compass::domain::session::FieldName;

struct Harness {
    store: Arc<InMemorySessionStore>,
    chat: ProcessTurnHandler,
    locks: SessionLocks,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemorySessionStore::new());
        let locks = SessionLocks::new();
        let chat = ProcessTurnHandler::new(store.clone(), None, None, locks.clone());
        Self { store, chat, locks }
    }

    async fn start(&self) -> SessionId {
        let result = self.send(None, "hello").await;
        result.session_id
    }

    async fn send(&self, session_id: Option<SessionId>, message: &str) -> ProcessTurnResult {
        self.chat
            .handle(ProcessTurnCommand {
                session_id,
                message: message.to_string(),
            })
            .await
            .expect("turn should not fail")
    }

    async fn run_script(&self, session_id: SessionId, script: &[&str]) -> ProcessTurnResult {
        let mut last = None;
        for utterance in script {
            last = Some(self.send(Some(session_id), utterance).await);
        }
        last.expect("script must not be empty")
    }
}

fn stages_of(results: &[ProcessTurnResult]) -> Vec<InterviewStage> {
    results.iter().map(|r| r.stage).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Branch coverage flows
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn business_person_visits_every_business_question() {
    let harness = Harness::new();
    let id = harness.start().await;

    let script = [
        "germany",
        "business person",
        "sole proprietor",
        "yes, I am a tax filer and my annual income is 1500000",
        "yes, I can manage 2 million PKR",
        "I have visited USA, Dubai, Sri Lanka",
        "2023",
        "yes, I have a valid USA visa",
        "no, never had any rejections",
        "35",
        "yes, I have an office with 5 employees",
        "yes, machinery and inventory",
        "yes, I have a website and Facebook page",
    ];

    let mut results = Vec::new();
    for utterance in script {
        results.push(harness.send(Some(id), utterance).await);
    }

    let visited = stages_of(&results);
    let expected = vec![
        InterviewStage::AskProfession,
        InterviewStage::AskBusinessType,
        InterviewStage::AskTaxInfo,
        InterviewStage::AskBalance,
        InterviewStage::AskTravel,
        InterviewStage::AskLastTravelYear,
        InterviewStage::AskValidVisa,
        InterviewStage::AskSchengenRejection,
        InterviewStage::AskAge,
        InterviewStage::AskBusinessPremises,
        InterviewStage::AskBusinessAssets,
        InterviewStage::AskBusinessOnlinePresence,
        InterviewStage::Complete,
    ];
    assert_eq!(visited, expected);

    let last = results.last().unwrap();
    assert!(last.is_complete);
    let evaluation = last.evaluation.as_ref().unwrap();
    // 3 trips, recent, heavy visa, full ties, strong financials.
    assert_eq!(evaluation.success_ratio, 90);
    assert!(evaluation.confidence >= 0.8);
}

#[tokio::test]
async fn job_holder_skips_business_questions() {
    let harness = Harness::new();
    let id = harness.start().await;

    let script = [
        "france",
        "job holder",
        "50000",
        "bank transfer",
        "yes, I am a tax filer and my annual income is 800000",
        "yes, I can manage 2 million PKR",
        "I have visited Dubai, Sri Lanka",
        "2022",
        "no, never had any rejections",
        "28",
    ];
    let last = harness.run_script(id, &script).await;

    assert!(last.is_complete);
    assert!(!last.answers.contains(FieldName::BusinessType));
    assert!(!last.answers.contains(FieldName::BusinessPremises));
    assert!(!last.answers.contains(FieldName::BusinessAssets));
    assert!(!last.answers.contains(FieldName::BusinessOnlinePresence));
    assert!(last.answers.contains(FieldName::Salary));
    assert!(last.answers.contains(FieldName::SalaryMode));
}

#[tokio::test]
async fn no_travel_history_skips_recency_and_visa_questions() {
    let harness = Harness::new();
    let id = harness.start().await;

    let script = [
        "italy",
        "business person",
        "private limited company",
        "yes, I am a tax filer and my annual income is 1200000",
        "yes, I can manage 2 million PKR",
        "no travel history",
        "no, never applied before",
        "42",
        "no, I work from home",
        "no assets",
        "no, I don't have online presence",
    ];

    let mut results = Vec::new();
    for utterance in script {
        results.push(harness.send(Some(id), utterance).await);
    }

    let visited = stages_of(&results);
    assert!(!visited.contains(&InterviewStage::AskLastTravelYear));
    assert!(!visited.contains(&InterviewStage::AskValidVisa));

    let last = results.last().unwrap();
    assert!(last.is_complete);
    assert!(last.answers.contains(FieldName::TravelHistory));
}

// ═══════════════════════════════════════════════════════════════════════════
// Country gating
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn unsupported_destination_can_switch_to_schengen() {
    let harness = Harness::new();
    let id = harness.start().await;

    let sidetracked = harness.send(Some(id), "USA").await;
    assert_eq!(sidetracked.stage, InterviewStage::CountryNotSupported);

    let back = harness.send(Some(id), "yes, let's try Schengen").await;
    assert_eq!(back.stage, InterviewStage::AskCountry);

    let advanced = harness.send(Some(id), "netherlands").await;
    assert_eq!(advanced.stage, InterviewStage::AskProfession);
}

#[tokio::test]
async fn declining_the_schengen_offer_ends_the_conversation() {
    let harness = Harness::new();
    let id = harness.start().await;

    harness.send(Some(id), "japan").await;
    let done = harness.send(Some(id), "no thanks").await;

    assert_eq!(done.stage, InterviewStage::Complete);
    assert!(done.evaluation.is_none());
}

#[tokio::test]
async fn ambiguous_country_text_re_asks_instead_of_advancing() {
    let harness = Harness::new();
    let id = harness.start().await;

    let result = harness.send(Some(id), "somewhere with good weather").await;

    assert_eq!(result.stage, InterviewStage::AskCountry);
    assert!(!result.answers.contains(FieldName::Country));
    assert!(result.message.contains("didn't recognize"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Off-track behavior
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn off_track_question_does_not_consume_the_turn() {
    let harness = Harness::new();
    let id = harness.start().await;

    harness
        .run_script(
            id,
            &[
                "germany",
                "business person",
                "sole proprietor",
                "yes, tax filer, income 1500000",
            ],
        )
        .await;
    let before = harness.store.load(id).await.unwrap().unwrap();
    assert_eq!(before.stage(), InterviewStage::AskBalance);

    let aside = harness.send(Some(id), "how much does this cost").await;

    // The canned fee answer, ending with the pending balance question.
    assert!(aside.message.contains("EUR 90"));
    assert!(aside
        .message
        .ends_with(InterviewStage::AskBalance.question()));

    let after = harness.store.load(id).await.unwrap().unwrap();
    assert_eq!(before, after);

    // The interview resumes exactly where it paused.
    let resumed = harness.send(Some(id), "yes, I can manage 2 million PKR").await;
    assert_eq!(resumed.stage, InterviewStage::AskTravel);
}

// ═══════════════════════════════════════════════════════════════════════════
// Scoring caps
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn low_balance_caps_an_otherwise_strong_profile_at_fifty() {
    let harness = Harness::new();
    let id = harness.start().await;

    let script = [
        "germany",
        "business person",
        "sole proprietor",
        "yes, I am a tax filer and my annual income is 1500000",
        "1000000",
        "I have visited USA, Dubai",
        "2023",
        "yes, I have a valid USA visa",
        "no, never had any rejections",
        "35",
        "yes, I have an office with 5 employees",
        "yes, machinery and inventory",
        "yes, I have a website and Facebook page",
    ];
    let last = harness.run_script(id, &script).await;

    assert!(last.is_complete);
    assert_eq!(last.evaluation.as_ref().unwrap().success_ratio, 50);
}

#[tokio::test]
async fn recent_rejection_drags_the_band_down() {
    let harness = Harness::new();
    let id = harness.start().await;

    let script = [
        "germany",
        "business person",
        "sole proprietor",
        "yes, I am a tax filer and my annual income is 1500000",
        "yes, I can manage 2 million PKR",
        "I have visited USA, Dubai",
        "2023",
        "yes, I have a valid USA visa",
        "yes, I was rejected in 2025",
        "35",
        "yes, I have an office with 5 employees",
        "yes, machinery and inventory",
        "yes, I have a website and Facebook page",
    ];
    let last = harness.run_script(id, &script).await;
    let with_rejection = last.evaluation.as_ref().unwrap().success_ratio;

    // Same profile without the rejection banded at 90; a fresh rejection
    // costs 20 raw points.
    assert!(with_rejection < 90);
    assert!(last
        .evaluation
        .as_ref()
        .unwrap()
        .risk_factors
        .iter()
        .any(|risk| risk.contains("rejection")));
}

// ═══════════════════════════════════════════════════════════════════════════
// Session lifecycle
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn get_state_reports_the_pending_question() {
    let harness = Harness::new();
    let id = harness.start().await;
    harness.send(Some(id), "germany").await;

    let get_handler = GetSessionStateHandler::new(harness.store.clone());
    let view = get_handler.handle(id).await.unwrap();

    assert_eq!(view.stage, InterviewStage::AskProfession);
    assert_eq!(
        view.pending_question.as_deref(),
        Some(InterviewStage::AskProfession.question())
    );
    assert!(view.answers.contains(FieldName::Country));
}

#[tokio::test]
async fn reset_restarts_a_completed_interview() {
    let harness = Harness::new();
    let id = harness.start().await;

    let script = [
        "france",
        "job holder",
        "50000",
        "bank transfer",
        "yes, I am a tax filer and my annual income is 800000",
        "yes, I can manage 2 million PKR",
        "no travel history",
        "no, never had any rejections",
        "28",
    ];
    let finished = harness.run_script(id, &script).await;
    assert!(finished.is_complete);

    let reset_handler = ResetSessionHandler::new(harness.store.clone(), harness.locks.clone());
    let fresh = reset_handler.handle(id).await.unwrap();

    assert_eq!(fresh.stage(), InterviewStage::AskCountry);
    assert!(fresh.answers().is_empty());
    assert!(fresh.evaluation().is_none());

    // The applicant can immediately interview again.
    let result = harness.send(Some(id), "spain").await;
    assert_eq!(result.stage, InterviewStage::AskProfession);
}

#[tokio::test]
async fn parallel_sessions_do_not_interfere() {
    let harness = Harness::new();
    let a = harness.start().await;
    let b = harness.start().await;

    harness.send(Some(a), "germany").await;
    harness.send(Some(b), "france").await;
    harness.send(Some(a), "business person").await;
    let b_result = harness.send(Some(b), "job holder").await;

    let a_state = harness.store.load(a).await.unwrap().unwrap();
    assert_eq!(a_state.stage(), InterviewStage::AskBusinessType);
    assert_eq!(b_result.stage, InterviewStage::AskSalary);
    assert_eq!(
        a_state
            .answers()
            .value(FieldName::Country)
            .and_then(|v| v.as_text()),
        Some("Germany")
    );
}
