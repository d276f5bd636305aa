//! Light fallback parsing for raw utterances.
//!
//! When the extractor is silent or low-confidence, the engine still has to
//! make forward progress: each question stage knows how to turn the raw
//! utterance into a best-effort answer for its own field. The rules here are
//! deliberately shallow (yes/no detection, digit runs, year detection); the
//! normalizer does the heavy lifting at evaluation time.

use serde_json::json;

use crate::domain::session::{FieldName, FieldValue};

use super::stage::InterviewStage;

/// Confidence attached to answers recovered by light parsing.
///
/// Below the acceptance threshold on purpose: a later extractor candidate
/// with real confidence may still replace these.
pub const LIGHT_PARSE_CONFIDENCE: f64 = 0.6;

const YES_WORDS: &[&str] = &["yes", "y", "yeah", "yep", "sure", "true", "1"];
const NO_WORDS: &[&str] = &["no", "n", "never", "nope", "false", "0", "not"];

/// Detects a yes/no answer in free text.
///
/// The first word decides when possible ("no, never had any rejections"),
/// otherwise any later standalone yes/no word is accepted. Returns `None`
/// when the text commits to neither.
pub fn parse_yes_no(text: &str) -> Option<bool> {
    let words: Vec<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect();

    let first = words.first()?;
    if YES_WORDS.contains(&first.as_str()) {
        return Some(true);
    }
    if NO_WORDS.contains(&first.as_str()) {
        return Some(false);
    }

    for word in &words {
        if word == "yes" {
            return Some(true);
        }
        if word == "no" || word == "never" {
            return Some(false);
        }
    }
    None
}

/// Extracts the first contiguous digit run from free text.
pub fn parse_first_number(text: &str) -> Option<i64> {
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
    // Truncate absurd runs rather than overflowing.
    digits.truncate(18);
    digits.parse().ok()
}

/// Finds a plausible 4-digit calendar year in free text.
pub fn parse_four_digit_year(text: &str) -> Option<i64> {
    let bytes: Vec<char> = text.chars().collect();
    let mut run_start = None;
    for (i, c) in bytes.iter().enumerate() {
        if c.is_ascii_digit() {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else if let Some(start) = run_start.take() {
            if i - start == 4 {
                let year: i64 = bytes[start..i].iter().collect::<String>().parse().ok()?;
                if (1900..=2100).contains(&year) {
                    return Some(year);
                }
            }
        }
    }
    if let Some(start) = run_start {
        if bytes.len() - start == 4 {
            let year: i64 = bytes[start..].iter().collect::<String>().parse().ok()?;
            if (1900..=2100).contains(&year) {
                return Some(year);
            }
        }
    }
    None
}

/// Derives best-effort answers for a stage from the raw utterance.
///
/// Always yields at least one answer for the stage's expected field so the
/// interview can move forward even with an unintelligible reply; the last
/// resort is the raw text itself.
pub fn fallback_answers(stage: InterviewStage, utterance: &str) -> Vec<(FieldName, FieldValue)> {
    use InterviewStage::*;

    let text_value = || FieldValue::Text(utterance.trim().to_string());

    match stage {
        AskProfession => vec![(FieldName::Profession, text_value())],
        AskBusinessType => vec![(FieldName::BusinessType, text_value())],
        AskSalary => match parse_first_number(utterance) {
            Some(amount) => vec![(FieldName::Salary, FieldValue::Number(amount))],
            None => vec![(FieldName::Salary, text_value())],
        },
        AskSalaryMode => vec![(FieldName::SalaryMode, text_value())],
        AskTaxInfo => {
            // One question collects two facts: filer status and the
            // declared income, when digits are present.
            let mut answers = Vec::new();
            match parse_yes_no(utterance) {
                Some(filer) => answers.push((FieldName::TaxFiler, FieldValue::Flag(filer))),
                None => answers.push((FieldName::TaxFiler, text_value())),
            }
            if let Some(income) = parse_first_number(utterance) {
                answers.push((FieldName::AnnualIncome, FieldValue::Number(income)));
            }
            answers
        }
        AskBalance => match parse_first_number(utterance) {
            Some(amount) if amount > 100 => {
                vec![(FieldName::ClosingBalance, FieldValue::Number(amount))]
            }
            _ => match parse_yes_no(utterance) {
                Some(can_manage) => {
                    vec![(FieldName::ClosingBalance, FieldValue::Flag(can_manage))]
                }
                None => vec![(FieldName::ClosingBalance, text_value())],
            },
        },
        AskTravel => vec![(FieldName::TravelHistory, text_value())],
        AskLastTravelYear => match parse_four_digit_year(utterance) {
            Some(year) => vec![(FieldName::LastTravelYear, FieldValue::Number(year))],
            None => vec![(FieldName::LastTravelYear, text_value())],
        },
        AskValidVisa => match parse_yes_no(utterance) {
            Some(valid) => vec![(FieldName::ValidVisa, FieldValue::Flag(valid))],
            None => vec![(FieldName::ValidVisa, text_value())],
        },
        AskSchengenRejection => match parse_yes_no(utterance) {
            Some(has_rejection) => {
                let record = match parse_four_digit_year(utterance) {
                    Some(year) => json!({ "has_rejection": has_rejection, "year": year }),
                    None => json!({ "has_rejection": has_rejection }),
                };
                vec![(
                    FieldName::SchengenRejection,
                    FieldValue::Structured(record),
                )]
            }
            None => vec![(FieldName::SchengenRejection, text_value())],
        },
        AskAge => match parse_first_number(utterance) {
            Some(age) => vec![(FieldName::Age, FieldValue::Number(age))],
            None => vec![(FieldName::Age, text_value())],
        },
        AskBusinessPremises => match parse_yes_no(utterance) {
            Some(flag) => vec![(FieldName::BusinessPremises, FieldValue::Flag(flag))],
            None => vec![(FieldName::BusinessPremises, text_value())],
        },
        AskBusinessAssets => match parse_yes_no(utterance) {
            Some(flag) => vec![(FieldName::BusinessAssets, FieldValue::Flag(flag))],
            None => vec![(FieldName::BusinessAssets, text_value())],
        },
        AskBusinessOnlinePresence => match parse_yes_no(utterance) {
            Some(flag) => vec![(FieldName::BusinessOnlinePresence, FieldValue::Flag(flag))],
            None => vec![(FieldName::BusinessOnlinePresence, text_value())],
        },
        // Country selection runs through destination gating instead, and
        // non-question stages collect nothing.
        AskCountry | CountryNotSupported | Evaluation | Complete => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod yes_no {
        use super::*;

        #[test]
        fn leading_word_decides() {
            assert_eq!(parse_yes_no("yes, I have an office"), Some(true));
            assert_eq!(parse_yes_no("no, never had any rejections"), Some(false));
            assert_eq!(parse_yes_no("Never applied before"), Some(false));
        }

        #[test]
        fn later_standalone_words_are_accepted() {
            assert_eq!(parse_yes_no("well, yes I think so"), Some(true));
            assert_eq!(parse_yes_no("I would say no"), Some(false));
        }

        #[test]
        fn embedded_fragments_do_not_count() {
            // "know" and "nothing" must not read as "no".
            assert_eq!(parse_yes_no("I know about this"), None);
            assert_eq!(parse_yes_no("tell me something"), None);
        }

        #[test]
        fn punctuation_is_ignored() {
            assert_eq!(parse_yes_no("Yes!"), Some(true));
            assert_eq!(parse_yes_no("No."), Some(false));
        }
    }

    mod numbers {
        use super::*;

        #[test]
        fn first_digit_run_wins() {
            assert_eq!(parse_first_number("my income is 1500000 PKR"), Some(1_500_000));
            assert_eq!(parse_first_number("1.5 million"), Some(1));
            assert_eq!(parse_first_number("no digits here"), None);
        }

        #[test]
        fn year_detection_requires_exactly_four_digits() {
            assert_eq!(parse_four_digit_year("2023"), Some(2023));
            assert_eq!(parse_four_digit_year("back in 2019, I think"), Some(2019));
            assert_eq!(parse_four_digit_year("500000"), None);
            assert_eq!(parse_four_digit_year("year 23"), None);
        }

        #[test]
        fn year_detection_rejects_implausible_years() {
            assert_eq!(parse_four_digit_year("around 1500"), None);
            assert_eq!(parse_four_digit_year("9999 sure"), None);
        }
    }

    mod fallback {
        use super::*;

        #[test]
        fn tax_info_collects_filer_and_income_together() {
            let answers = fallback_answers(
                InterviewStage::AskTaxInfo,
                "yes, I am a tax filer and my annual income is 1500000",
            );
            assert_eq!(answers.len(), 2);
            assert_eq!(answers[0].0, FieldName::TaxFiler);
            assert_eq!(answers[0].1, FieldValue::Flag(true));
            assert_eq!(answers[1].0, FieldName::AnnualIncome);
            assert_eq!(answers[1].1, FieldValue::Number(1_500_000));
        }

        #[test]
        fn balance_prefers_amount_over_yes_no() {
            let answers =
                fallback_answers(InterviewStage::AskBalance, "I can show 2500000 in my account");
            assert_eq!(answers[0].1, FieldValue::Number(2_500_000));

            let answers =
                fallback_answers(InterviewStage::AskBalance, "yes, I can manage 2 million PKR");
            // "2" alone is not a balance; the affirmation wins.
            assert_eq!(answers[0].1, FieldValue::Flag(true));
        }

        #[test]
        fn rejection_answer_becomes_structured_record() {
            let answers = fallback_answers(
                InterviewStage::AskSchengenRejection,
                "yes, I was rejected in 2022",
            );
            match &answers[0].1 {
                FieldValue::Structured(record) => {
                    assert_eq!(record["has_rejection"], true);
                    assert_eq!(record["year"], 2022);
                }
                other => panic!("expected structured record, got {:?}", other),
            }
        }

        #[test]
        fn unintelligible_reply_still_stores_raw_text() {
            let answers = fallback_answers(InterviewStage::AskAge, "rather not say");
            assert_eq!(answers[0].0, FieldName::Age);
            assert_eq!(
                answers[0].1,
                FieldValue::Text("rather not say".to_string())
            );
        }

        #[test]
        fn non_question_stages_collect_nothing() {
            assert!(fallback_answers(InterviewStage::Evaluation, "anything").is_empty());
            assert!(fallback_answers(InterviewStage::Complete, "anything").is_empty());
            assert!(fallback_answers(InterviewStage::AskCountry, "germany").is_empty());
        }
    }
}
