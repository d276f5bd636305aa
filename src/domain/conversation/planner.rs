//! Question planner - decides what to ask next.
//!
//! The planner is a pure function of the answer bag: it walks the canonical
//! question order and returns the first stage whose required field is
//! unanswered, applying the branch rules. It never reorders questions, so
//! repeated calls with the same bag always agree.

use crate::domain::evaluation::{
    parse_travel_countries, profession_is_business, profession_is_job_holder,
};
use crate::domain::session::{AnswerBag, FieldName, FieldValue};

use super::countries::is_heavy_visa_country;
use super::stage::InterviewStage;

/// What the interview should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedStep {
    /// Ask the question for this stage.
    Ask(InterviewStage),
    /// Every required field is answered; run the evaluation.
    Evaluate,
}

fn profession_text(answers: &AnswerBag) -> &str {
    answers
        .value(FieldName::Profession)
        .and_then(|v| v.as_text())
        .unwrap_or("")
}

fn has_travel_history(answers: &AnswerBag) -> bool {
    answers
        .value(FieldName::TravelHistory)
        .map(|value| !parse_travel_countries(value).is_empty())
        .unwrap_or(false)
}

fn travel_mentions_heavy_country(answers: &AnswerBag) -> bool {
    match answers.value(FieldName::TravelHistory) {
        Some(value) => {
            parse_travel_countries(value)
                .iter()
                .any(|country| is_heavy_visa_country(country))
                || matches!(value, FieldValue::Text(s) if is_heavy_visa_country(s))
        }
        None => false,
    }
}

/// Returns the next unanswered question, or the evaluation step.
///
/// Branch rules:
/// - `business_type` only for business profiles
/// - `salary`/`salary_mode` only for job holders
/// - `last_travel_year` only when travel history is non-empty
/// - `valid_visa` only when the travel history mentions a heavy-visa country
/// - the three business-ties questions only for business profiles
/// - `age` always, once the branches above are resolved
pub fn next_step(answers: &AnswerBag) -> PlannedStep {
    use InterviewStage::*;

    if !answers.contains(FieldName::Country) {
        return PlannedStep::Ask(AskCountry);
    }
    if !answers.contains(FieldName::Profession) {
        return PlannedStep::Ask(AskProfession);
    }

    let profession = profession_text(answers);
    let is_business = profession_is_business(profession);
    let is_job_holder = profession_is_job_holder(profession);

    if is_business && !answers.contains(FieldName::BusinessType) {
        return PlannedStep::Ask(AskBusinessType);
    }
    if is_job_holder {
        if !answers.contains(FieldName::Salary) {
            return PlannedStep::Ask(AskSalary);
        }
        if !answers.contains(FieldName::SalaryMode) {
            return PlannedStep::Ask(AskSalaryMode);
        }
    }

    if !answers.contains(FieldName::TaxFiler) {
        return PlannedStep::Ask(AskTaxInfo);
    }
    if !answers.contains(FieldName::ClosingBalance) {
        return PlannedStep::Ask(AskBalance);
    }
    if !answers.contains(FieldName::TravelHistory) {
        return PlannedStep::Ask(AskTravel);
    }

    if has_travel_history(answers) && !answers.contains(FieldName::LastTravelYear) {
        return PlannedStep::Ask(AskLastTravelYear);
    }
    if travel_mentions_heavy_country(answers) && !answers.contains(FieldName::ValidVisa) {
        return PlannedStep::Ask(AskValidVisa);
    }

    if !answers.contains(FieldName::SchengenRejection) {
        return PlannedStep::Ask(AskSchengenRejection);
    }
    if !answers.contains(FieldName::Age) {
        return PlannedStep::Ask(AskAge);
    }

    if is_business {
        if !answers.contains(FieldName::BusinessPremises) {
            return PlannedStep::Ask(AskBusinessPremises);
        }
        if !answers.contains(FieldName::BusinessAssets) {
            return PlannedStep::Ask(AskBusinessAssets);
        }
        if !answers.contains(FieldName::BusinessOnlinePresence) {
            return PlannedStep::Ask(AskBusinessOnlinePresence);
        }
    }

    PlannedStep::Evaluate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(FieldName, FieldValue)]) -> AnswerBag {
        let mut bag = AnswerBag::new();
        for (name, value) in entries {
            bag.record_direct(*name, value.clone(), 1.0);
        }
        bag
    }

    fn business_base() -> Vec<(FieldName, FieldValue)> {
        vec![
            (FieldName::Country, "germany".into()),
            (FieldName::Profession, "business person".into()),
        ]
    }

    fn job_holder_base() -> Vec<(FieldName, FieldValue)> {
        vec![
            (FieldName::Country, "france".into()),
            (FieldName::Profession, "job holder".into()),
        ]
    }

    mod canonical_order {
        use super::*;

        #[test]
        fn empty_bag_asks_for_country_first() {
            assert_eq!(
                next_step(&AnswerBag::new()),
                PlannedStep::Ask(InterviewStage::AskCountry)
            );
        }

        #[test]
        fn country_alone_asks_for_profession() {
            let answers = bag(&[(FieldName::Country, "germany".into())]);
            assert_eq!(
                next_step(&answers),
                PlannedStep::Ask(InterviewStage::AskProfession)
            );
        }

        #[test]
        fn business_profile_walks_the_business_branch() {
            let mut entries = business_base();
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskBusinessType)
            );

            entries.push((FieldName::BusinessType, "sole proprietor".into()));
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskTaxInfo)
            );
        }

        #[test]
        fn job_holder_walks_the_salary_branch() {
            let mut entries = job_holder_base();
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskSalary)
            );

            entries.push((FieldName::Salary, FieldValue::Number(50_000)));
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskSalaryMode)
            );
        }
    }

    mod branch_skipping {
        use super::*;

        #[test]
        fn job_holder_never_sees_business_questions() {
            let entries = vec![
                (FieldName::Country, "france".into()),
                (FieldName::Profession, "job holder".into()),
                (FieldName::Salary, FieldValue::Number(50_000)),
                (FieldName::SalaryMode, "bank transfer".into()),
                (FieldName::TaxFiler, true.into()),
                (FieldName::ClosingBalance, true.into()),
                (FieldName::TravelHistory, "no travel history".into()),
                (FieldName::SchengenRejection, false.into()),
                (FieldName::Age, FieldValue::Number(28)),
            ];
            assert_eq!(next_step(&bag(&entries)), PlannedStep::Evaluate);
        }

        #[test]
        fn no_travel_answer_skips_recency_and_visa_questions() {
            let entries = vec![
                (FieldName::Country, "italy".into()),
                (FieldName::Profession, "job holder".into()),
                (FieldName::Salary, FieldValue::Number(80_000)),
                (FieldName::SalaryMode, "bank".into()),
                (FieldName::TaxFiler, true.into()),
                (FieldName::ClosingBalance, true.into()),
                (FieldName::TravelHistory, "never traveled".into()),
            ];
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskSchengenRejection)
            );
        }

        #[test]
        fn travel_without_heavy_country_skips_only_visa_question() {
            let mut entries = vec![
                (FieldName::Country, "spain".into()),
                (FieldName::Profession, "job holder".into()),
                (FieldName::Salary, FieldValue::Number(80_000)),
                (FieldName::SalaryMode, "bank".into()),
                (FieldName::TaxFiler, true.into()),
                (FieldName::ClosingBalance, true.into()),
                (FieldName::TravelHistory, "Dubai, Sri Lanka".into()),
            ];
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskLastTravelYear)
            );

            entries.push((FieldName::LastTravelYear, FieldValue::Number(2022)));
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskSchengenRejection)
            );
        }

        #[test]
        fn heavy_visa_travel_requires_the_visa_question() {
            let entries = vec![
                (FieldName::Country, "germany".into()),
                (FieldName::Profession, "job holder".into()),
                (FieldName::Salary, FieldValue::Number(80_000)),
                (FieldName::SalaryMode, "bank".into()),
                (FieldName::TaxFiler, true.into()),
                (FieldName::ClosingBalance, true.into()),
                (FieldName::TravelHistory, "USA, Dubai".into()),
                (FieldName::LastTravelYear, FieldValue::Number(2023)),
            ];
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskValidVisa)
            );
        }

        #[test]
        fn business_profile_finishes_with_ties_questions() {
            let mut entries = vec![
                (FieldName::Country, "germany".into()),
                (FieldName::Profession, "business person".into()),
                (FieldName::BusinessType, "sole proprietor".into()),
                (FieldName::TaxFiler, true.into()),
                (FieldName::ClosingBalance, true.into()),
                (FieldName::TravelHistory, "no".into()),
                (FieldName::SchengenRejection, false.into()),
                (FieldName::Age, FieldValue::Number(42)),
            ];
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskBusinessPremises)
            );

            entries.push((FieldName::BusinessPremises, false.into()));
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskBusinessAssets)
            );

            entries.push((FieldName::BusinessAssets, false.into()));
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskBusinessOnlinePresence)
            );

            entries.push((FieldName::BusinessOnlinePresence, false.into()));
            assert_eq!(next_step(&bag(&entries)), PlannedStep::Evaluate);
        }

        #[test]
        fn neither_profession_branch_skips_both() {
            let entries = vec![
                (FieldName::Country, "germany".into()),
                (FieldName::Profession, "freelance artist".into()),
            ];
            assert_eq!(
                next_step(&bag(&entries)),
                PlannedStep::Ask(InterviewStage::AskTaxInfo)
            );
        }
    }

    mod determinism {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn repeated_calls_agree() {
            let answers = bag(&[
                (FieldName::Country, "germany".into()),
                (FieldName::Profession, "business person".into()),
            ]);
            assert_eq!(next_step(&answers), next_step(&answers));
        }

        proptest! {
            /// The planner depends only on field presence and branch flags,
            /// so any subset of answered fields must plan deterministically.
            #[test]
            fn planner_is_a_pure_function_of_the_bag(mask in 0u16..u16::MAX) {
                let fields = [
                    (FieldName::Country, FieldValue::Text("germany".into())),
                    (FieldName::Profession, FieldValue::Text("business person".into())),
                    (FieldName::BusinessType, FieldValue::Text("sole proprietor".into())),
                    (FieldName::TaxFiler, FieldValue::Flag(true)),
                    (FieldName::ClosingBalance, FieldValue::Flag(true)),
                    (FieldName::TravelHistory, FieldValue::Text("USA, Dubai".into())),
                    (FieldName::LastTravelYear, FieldValue::Number(2023)),
                    (FieldName::ValidVisa, FieldValue::Flag(true)),
                    (FieldName::SchengenRejection, FieldValue::Flag(false)),
                    (FieldName::Age, FieldValue::Number(35)),
                    (FieldName::BusinessPremises, FieldValue::Flag(true)),
                    (FieldName::BusinessAssets, FieldValue::Flag(true)),
                    (FieldName::BusinessOnlinePresence, FieldValue::Flag(true)),
                ];
                let mut answers = AnswerBag::new();
                for (i, (name, value)) in fields.iter().enumerate() {
                    if mask & (1 << i) != 0 {
                        answers.record_direct(*name, value.clone(), 1.0);
                    }
                }
                prop_assert_eq!(next_step(&answers), next_step(&answers));
            }
        }
    }
}
