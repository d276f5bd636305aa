//! Off-track classification and canned FAQ redirects.
//!
//! Mid-interview, applicants routinely ask about fees, timelines, or
//! documents instead of answering the pending question. The classifier
//! decides whether an utterance belongs to the interview; when it does not,
//! a canned FAQ answer (or the LLM responder, as a collaborator fallback)
//! handles it and steers the applicant back. An off-track turn never
//! consumes interview state.
//!
//! Like the profession heuristics, the keyword matching here is knowingly
//! ambiguous; it mirrors the reference behavior rather than improving on it.

use once_cell::sync::Lazy;

use super::stage::InterviewStage;

/// Category of an off-track question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffTrackCategory {
    GeneralInfo,
    CountrySelection,
    Fees,
    Timing,
    Documents,
    Rejection,
    GeneralHelp,
}

impl OffTrackCategory {
    /// Stable identifier for logging and responder prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            OffTrackCategory::GeneralInfo => "general_info",
            OffTrackCategory::CountrySelection => "country_selection",
            OffTrackCategory::Fees => "fees",
            OffTrackCategory::Timing => "timing",
            OffTrackCategory::Documents => "documents",
            OffTrackCategory::Rejection => "rejection",
            OffTrackCategory::GeneralHelp => "general_help",
        }
    }
}

/// Phrases that mark each off-track category, checked in declaration order.
const OFF_TRACK_PATTERNS: &[(OffTrackCategory, &[&str])] = &[
    (
        OffTrackCategory::GeneralInfo,
        &["what is", "how does", "can you tell", "explain", "information"],
    ),
    (
        OffTrackCategory::CountrySelection,
        &["best country", "which country", "recommend", "suggest", "good country"],
    ),
    (
        OffTrackCategory::Fees,
        &["cost", "fee", "price", "how much", "charge"],
    ),
    (
        OffTrackCategory::Timing,
        &["how long", "when", "duration", "processing"],
    ),
    (
        OffTrackCategory::Documents,
        &["documents", "papers", "requirements", "what needed"],
    ),
    (
        OffTrackCategory::Rejection,
        &["rejected", "denied", "refused", "appeal", "what if"],
    ),
    (
        OffTrackCategory::GeneralHelp,
        &["help", "assist", "guide", "advice", "support"],
    ),
];

/// Keywords that mark an utterance as an answer to the pending question.
///
/// On-track always wins: if any expected keyword is present, the utterance
/// is treated as an answer even when it also contains off-track phrasing.
fn expected_keywords(stage: InterviewStage) -> &'static [&'static str] {
    use InterviewStage::*;
    match stage {
        AskCountry => &["country", "nation", "destination", "visa for"],
        CountryNotSupported => &["yes", "no", "schengen", "europe", "interested"],
        AskProfession => &["business", "job", "employee", "profession", "work"],
        AskBusinessType => &["sole", "proprietor", "private", "limited", "company"],
        AskSalary => &["salary", "income", "earnings", "pay", "amount"],
        AskSalaryMode => &["bank", "transfer", "cash", "payment", "mode"],
        AskTaxInfo => &["tax", "filer", "income", "annual", "return"],
        AskBalance => &["balance", "bank", "money", "account", "funds"],
        AskTravel => &["travel", "history", "countries", "visited", "trip"],
        AskLastTravelYear => &["year", "travel", "trip", "last"],
        AskValidVisa => &["visa", "valid", "usa", "uk", "canada", "australia"],
        AskSchengenRejection => &["reject", "refus", "never", "applied"],
        AskAge => &["age", "years old", "year old"],
        AskBusinessPremises => &["office", "shop", "warehouse", "premises", "home"],
        AskBusinessAssets => &["asset", "machinery", "inventory", "stock", "equipment"],
        AskBusinessOnlinePresence => &["website", "facebook", "online", "social", "instagram"],
        Evaluation | Complete => &[],
    }
}

/// Classifies an utterance against the pending question.
///
/// Returns `None` when the utterance reads as an answer (on-track), or the
/// matched category when it reads as an aside.
pub fn classify(utterance: &str, stage: InterviewStage) -> Option<OffTrackCategory> {
    let text = utterance.to_lowercase();

    if expected_keywords(stage)
        .iter()
        .any(|keyword| text.contains(keyword))
    {
        return None;
    }

    for (category, patterns) in OFF_TRACK_PATTERNS {
        if patterns.iter().any(|pattern| text.contains(pattern)) {
            return Some(*category);
        }
    }
    None
}

/// A canned FAQ entry.
struct FaqEntry {
    question: &'static str,
    answer: &'static str,
    category: OffTrackCategory,
    keywords: &'static [&'static str],
}

static FAQ_CATALOG: Lazy<Vec<FaqEntry>> = Lazy::new(|| {
    vec![
        FaqEntry {
            question: "Which Schengen country has the highest visa approval rate?",
            answer: "Germany typically has the highest approval rate for Schengen visas, \
                     followed by France and Italy. However, approval rates vary based on \
                     individual circumstances, documentation quality, and the specific \
                     embassy's current policies.",
            category: OffTrackCategory::CountrySelection,
            keywords: &[
                "best country",
                "highest approval",
                "success rate",
                "which country",
                "approval rate",
                "good country",
            ],
        },
        FaqEntry {
            question: "What are the visa fees for Schengen countries?",
            answer: "Schengen visa fees are standardized: EUR 90 for adults, EUR 40 for \
                     children (6-12 years), and free for children under 6. Some categories \
                     like students, researchers, and family members may have reduced or \
                     waived fees.",
            category: OffTrackCategory::Fees,
            keywords: &["cost", "fee", "price", "how much", "visa fee", "application cost"],
        },
        FaqEntry {
            question: "How long does visa processing take?",
            answer: "Standard Schengen visa processing takes 15 calendar days, but can \
                     extend up to 30 days in some cases. During peak seasons (summer, \
                     holidays), processing may take longer. It's recommended to apply at \
                     least 3-4 weeks before travel.",
            category: OffTrackCategory::Timing,
            keywords: &[
                "how long",
                "processing time",
                "duration",
                "when",
                "timeline",
                "waiting time",
            ],
        },
        FaqEntry {
            question: "What documents are required for a Schengen visa?",
            answer: "Required documents include: valid passport (3 months validity beyond \
                     stay), visa application form, recent photos, travel insurance, flight \
                     itinerary, accommodation proof, financial statements, employment \
                     letter, and travel purpose documentation.",
            category: OffTrackCategory::Documents,
            keywords: &[
                "documents",
                "requirements",
                "what needed",
                "papers",
                "documentation",
                "checklist",
            ],
        },
        FaqEntry {
            question: "What is the minimum bank balance for a Schengen visa?",
            answer: "There's no fixed minimum, but generally EUR 50-100 per day of stay is \
                     recommended. The amount varies by country and individual \
                     circumstances; a healthy, stable closing balance reads far better \
                     than a sudden deposit.",
            category: OffTrackCategory::GeneralInfo,
            keywords: &[
                "bank balance",
                "minimum amount",
                "money required",
                "financial proof",
                "bank statement",
            ],
        },
        FaqEntry {
            question: "Can I apply for multiple Schengen visas?",
            answer: "Yes, you can apply for multiple Schengen visas. However, you must \
                     apply to the country where you'll spend the most time, or the first \
                     country you'll enter if staying equal time in multiple countries.",
            category: OffTrackCategory::GeneralInfo,
            keywords: &["multiple visas", "several countries", "more than one", "different countries"],
        },
        FaqEntry {
            question: "What if my visa is rejected?",
            answer: "If rejected, you can appeal within 30 days. Common reasons include \
                     insufficient funds, unclear travel purpose, or incomplete \
                     documentation. You can reapply after addressing the issues mentioned \
                     in the rejection letter.",
            category: OffTrackCategory::Rejection,
            keywords: &["rejected", "denied", "refused", "what if", "appeal", "rejection"],
        },
        FaqEntry {
            question: "Do I need travel insurance for a Schengen visa?",
            answer: "Yes, travel insurance is mandatory for Schengen visas. It must cover \
                     at least EUR 30,000 for medical expenses and repatriation, and be \
                     valid for the entire duration of your stay in the Schengen area.",
            category: OffTrackCategory::Documents,
            keywords: &["travel insurance", "medical insurance", "insurance required", "health coverage"],
        },
        FaqEntry {
            question: "What are the best months to apply for a Schengen visa?",
            answer: "Apply 3-4 months before travel, avoiding peak seasons (May-August, \
                     December). January-March and September-November typically have faster \
                     processing times. Avoid applying during major holidays.",
            category: OffTrackCategory::Timing,
            keywords: &["best time", "when to apply", "timing", "months", "season", "peak time"],
        },
        FaqEntry {
            question: "Can I work on a Schengen tourist visa?",
            answer: "No, tourist visas are strictly for tourism, family visits, or \
                     business meetings. Working, studying, or conducting business \
                     activities requires specific visa types. Violating visa terms can \
                     result in future rejections.",
            category: OffTrackCategory::GeneralInfo,
            keywords: &["work on", "employment abroad", "work permit", "study visa"],
        },
    ]
});

/// Minimum relevance score for a canned answer to be used.
const FAQ_SCORE_THRESHOLD: u32 = 2;

fn score_faq(entry: &FaqEntry, utterance: &str, category: OffTrackCategory) -> u32 {
    let text = utterance.to_lowercase();
    let mut score = 0;

    for keyword in entry.keywords {
        if text.contains(keyword) {
            score += 2;
        }
    }
    if entry.category == category {
        score += 1;
    }
    let question = entry.question.to_lowercase();
    if text
        .split_whitespace()
        .any(|word| word.len() > 3 && question.contains(word))
    {
        score += 1;
    }

    score
}

/// Fixed transition sentence used between an aside answer and the pending
/// question. Deterministic by design.
const TRANSITION: &str = "Now, let's continue with your evaluation:";

/// Composes a full off-track reply from an answer and the pending question.
pub fn compose_redirect(answer: &str, pending_question: &str) -> String {
    format!("{answer}\n\n{TRANSITION}\n\n{pending_question}")
}

/// Finds a canned answer for an off-track utterance, if one is relevant.
///
/// The reply always ends by restating the pending question. Returns `None`
/// when no FAQ entry scores high enough; callers may then consult the LLM
/// responder or fall back to [`generic_redirect`].
pub fn canned_response(
    utterance: &str,
    category: OffTrackCategory,
    pending_question: &str,
) -> Option<String> {
    let best = FAQ_CATALOG
        .iter()
        .map(|entry| (score_faq(entry, utterance, category), entry))
        .max_by_key(|(score, _)| *score)?;

    let (score, entry) = best;
    if score < FAQ_SCORE_THRESHOLD {
        return None;
    }
    Some(compose_redirect(entry.answer, pending_question))
}

/// Fallback reply when neither the FAQ catalog nor the responder can help.
pub fn generic_redirect(pending_question: &str) -> String {
    compose_redirect(
        "I understand your question. Let me help you with that after we complete your \
         evaluation. For now, let's continue with the assessment so I can give you \
         accurate guidance.",
        pending_question,
    )
}
