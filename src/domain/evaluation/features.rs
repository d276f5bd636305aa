//! Feature normalization - from raw answers to canonical typed features.
//!
//! Every rule here is tolerant: a missing or malformed answer becomes an
//! unknown feature (or a zero amount), never an error. The heuristics are
//! substring-based on purpose and inherit the reference behavior's known
//! ambiguity (a "business student" reads as a business profile); changing
//! them would change observable scores.

use crate::domain::conversation::{is_heavy_visa_country, is_schengen_country};
use crate::domain::session::{AnswerBag, FieldName, FieldValue};

/// Sentinel for "rejection confirmed but year unknown": treated as very old
/// so the penalty errs on the conservative side.
const UNKNOWN_REJECTION_YEARS: i64 = 99;

const BUSINESS_WORDS: &[&str] = &["business", "owner", "entrepreneur", "proprietor"];
const JOB_WORDS: &[&str] = &["job", "employed", "employee", "worker", "salary"];

const NEGATIVE_TRAVEL_PHRASES: &[&str] = &[
    "no",
    "none",
    "never",
    "no history",
    "no travel",
    "no travel history",
    "never traveled",
    "never travelled",
    "no international travel",
];

/// Canonical features derived from the answer bag.
///
/// Recomputed on demand; never persisted independently.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeatures {
    pub is_business: bool,
    pub is_job_holder: bool,
    pub business_type: Option<String>,
    pub business_premises: Option<bool>,
    pub business_online_presence: Option<bool>,
    pub business_assets: Option<bool>,

    pub is_tax_filer: Option<bool>,
    pub annual_income_pk: i64,
    pub closing_balance_pk: i64,

    pub travel_countries: Vec<String>,
    pub travel_count: usize,
    pub has_schengen_travel: bool,
    pub has_heavy_visa: Option<bool>,
    pub years_since_last_travel: Option<i64>,

    pub previous_schengen_rejection: Option<bool>,
    pub previous_schengen_rejection_years_ago: Option<i64>,

    pub age: Option<i64>,
}

/// Returns true if the profession text reads as a business profile.
pub fn profession_is_business(profession: &str) -> bool {
    let text = profession.to_lowercase();
    BUSINESS_WORDS.iter().any(|word| text.contains(word))
}

/// Returns true if the profession text reads as salaried employment.
///
/// A text matching both vocabularies counts as business; the business branch
/// wins.
pub fn profession_is_job_holder(profession: &str) -> bool {
    let text = profession.to_lowercase();
    JOB_WORDS.iter().any(|word| text.contains(word)) && !profession_is_business(profession)
}

fn to_flag(value: &FieldValue) -> Option<bool> {
    match value {
        FieldValue::Flag(b) => Some(*b),
        FieldValue::Number(n) => Some(*n != 0),
        FieldValue::Text(s) => text_to_bool(s),
        _ => None,
    }
}

fn text_to_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn first_digit_run(text: &str) -> Option<i64> {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        return None;
    }
    digits.truncate(18);
    digits.parse().ok()
}

/// Parses a monetary amount from a value, applying million multipliers.
fn to_amount(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Number(n) => *n,
        FieldValue::Flag(b) => i64::from(*b),
        FieldValue::Text(s) => {
            let text = s.trim().to_lowercase();
            let first = match first_digit_run(&text) {
                Some(n) => n,
                None => return 0,
            };
            if ["million", "mn", "mio"]
                .iter()
                .any(|token| text.contains(token))
            {
                first.saturating_mul(1_000_000)
            } else {
                first
            }
        }
        _ => 0,
    }
}

/// Normalizes a travel-history value into a list of country names.
pub fn parse_travel_countries(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::List(items) => items
            .iter()
            .map(|item| title_case(item.trim()))
            .filter(|item| !item.is_empty())
            .collect(),
        FieldValue::Text(s) => {
            let lowered = s.to_lowercase();
            let lowered = lowered.trim();
            if NEGATIVE_TRAVEL_PHRASES
                .iter()
                .any(|phrase| lowered.contains(phrase))
            {
                return Vec::new();
            }
            s.replace('/', ",")
                .split(',')
                .map(|part| title_case(strip_travel_filler(part.trim())))
                .filter(|part| !part.is_empty())
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Drops leading narration like "I have visited" from a travel fragment.
fn strip_travel_filler(part: &str) -> &str {
    const FILLERS: &[&str] = &[
        "i have visited",
        "i visited",
        "i have been to",
        "i went to",
        "visited",
        "and",
    ];
    let lowered = part.to_lowercase();
    for filler in FILLERS {
        if lowered.starts_with(filler) {
            let rest = &part[filler.len()..];
            return rest.trim_start();
        }
    }
    part
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn years_since(value: &FieldValue, current_year: i64) -> Option<i64> {
    let year = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => first_digit_run(s.trim())?,
        _ => return None,
    };
    if (1900..=current_year).contains(&year) {
        Some((current_year - year).max(0))
    } else {
        None
    }
}

/// Interprets a rejection answer of any accepted shape.
///
/// Returns `(had_rejection, years_ago)`; a confirmed rejection with no year
/// yields the very-old sentinel rather than unknown.
fn parse_rejection(value: &FieldValue, current_year: i64) -> (Option<bool>, Option<i64>) {
    match value {
        FieldValue::Structured(record) => {
            let has = record
                .get("has_rejection")
                .and_then(|v| match v {
                    serde_json::Value::Bool(b) => Some(*b),
                    serde_json::Value::String(s) => text_to_bool(s),
                    serde_json::Value::Number(n) => n.as_i64().map(|n| n != 0),
                    _ => None,
                });
            if has != Some(true) {
                return (has, None);
            }
            let years = record
                .get("year")
                .map(|v| match v {
                    serde_json::Value::Number(n) => {
                        FieldValue::Number(n.as_i64().unwrap_or_default())
                    }
                    serde_json::Value::String(s) => FieldValue::Text(s.clone()),
                    other => FieldValue::Structured(other.clone()),
                })
                .and_then(|v| years_since(&v, current_year))
                .unwrap_or(UNKNOWN_REJECTION_YEARS);
            (Some(true), Some(years))
        }
        other => match to_flag(other) {
            Some(true) => (Some(true), Some(UNKNOWN_REJECTION_YEARS)),
            Some(false) => (Some(false), None),
            None => (None, None),
        },
    }
}

fn heavy_visa_signal(answers: &AnswerBag, travel_countries: &[String]) -> Option<bool> {
    // An explicit visa answer beats inference from travel text.
    if let Some(value) = answers.value(FieldName::ValidVisa) {
        if let Some(flag) = to_flag(value) {
            return Some(flag);
        }
    }
    if travel_countries
        .iter()
        .any(|country| is_heavy_visa_country(country))
    {
        return Some(true);
    }
    None
}

/// Derives canonical features from the answer bag.
///
/// Total: any answer shape produces a feature set. `current_year` anchors
/// the recency computations so callers (and tests) control the clock.
pub fn normalize_answers(answers: &AnswerBag, current_year: i64) -> NormalizedFeatures {
    let profession = answers
        .value(FieldName::Profession)
        .and_then(|v| v.as_text())
        .unwrap_or("");
    let is_business = profession_is_business(profession);
    let is_job_holder = profession_is_job_holder(profession);

    let business_type = answers
        .value(FieldName::BusinessType)
        .and_then(|v| v.as_text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let closing_balance_pk = match answers.value(FieldName::ClosingBalance) {
        // A bare confirmation means the applicant can show the 2M threshold.
        Some(FieldValue::Flag(true)) => 2_000_000,
        Some(FieldValue::Flag(false)) | None => 0,
        Some(other) => to_amount(other),
    };

    let travel_countries = answers
        .value(FieldName::TravelHistory)
        .map(parse_travel_countries)
        .unwrap_or_default();
    let travel_count = travel_countries.len();
    let has_schengen_travel = travel_countries
        .iter()
        .any(|country| is_schengen_country(country));
    let has_heavy_visa = heavy_visa_signal(answers, &travel_countries);

    let (previous_schengen_rejection, previous_schengen_rejection_years_ago) = answers
        .value(FieldName::SchengenRejection)
        .map(|value| parse_rejection(value, current_year))
        .unwrap_or((None, None));

    let age = answers.value(FieldName::Age).and_then(|value| match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(s) => first_digit_run(s.trim()),
        _ => None,
    });

    NormalizedFeatures {
        is_business,
        is_job_holder,
        business_type,
        business_premises: answers
            .value(FieldName::BusinessPremises)
            .and_then(to_flag),
        business_online_presence: answers
            .value(FieldName::BusinessOnlinePresence)
            .and_then(to_flag),
        business_assets: answers.value(FieldName::BusinessAssets).and_then(to_flag),
        is_tax_filer: answers.value(FieldName::TaxFiler).and_then(to_flag),
        annual_income_pk: answers
            .value(FieldName::AnnualIncome)
            .map(to_amount)
            .unwrap_or(0),
        closing_balance_pk,
        travel_countries,
        travel_count,
        has_schengen_travel,
        has_heavy_visa,
        years_since_last_travel: answers
            .value(FieldName::LastTravelYear)
            .and_then(|value| years_since(value, current_year)),
        previous_schengen_rejection,
        previous_schengen_rejection_years_ago,
        age,
    }
}
