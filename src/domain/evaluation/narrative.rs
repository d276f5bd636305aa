//! Narrative builder - renders an evaluation as applicant-facing text.
//!
//! Stateless assembly of plain text with light Markdown emphasis. The
//! structure is fixed: intro, success ratio, four numbered guidance lines,
//! an optional bullet list of rubric recommendations, an optional strategy
//! paragraph, and a closing call to action.

use crate::domain::session::{AnswerBag, FieldName, FieldValue};

use super::rubric::Evaluation;

/// Maximum rubric recommendations surfaced in the "additionally" list.
const MAX_EXTRA_RECOMMENDATIONS: usize = 4;

/// Maximum travel countries echoed back in the travel line.
const MAX_TRAVEL_COUNTRIES: usize = 6;

/// Renders the final assessment text for the applicant.
pub fn build_narrative(evaluation: &Evaluation, answers: &AnswerBag) -> String {
    let country = answers
        .value(FieldName::Country)
        .and_then(|v| v.as_text())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let intro = match country {
        Some(country) => format!(
            "Thanks for sharing your details. Based on your information, here's our \
             assessment for {country}."
        ),
        None => "Thanks for sharing your details. Based on your information, here's our \
                 assessment:"
            .to_string(),
    };

    let ratio_line = format!("**Success Ratio:** {}%", evaluation.success_ratio);

    let travel_line = travel_line(answers);
    let purpose_line = "Have a clear and verifiable purpose (event, exhibition, client \
                        meetings, or a formal business invitation).";
    let ties_line = ties_line(answers);

    let mut parts: Vec<String> = Vec::new();
    parts.push(intro);
    parts.push(ratio_line);

    parts.push("\n**Recommendations**".to_string());
    parts.push(format!("1. {}", evaluation.overall_recommendation));
    parts.push(format!("2. {travel_line}"));
    parts.push(format!("3. {purpose_line}"));
    parts.push(format!("4. {ties_line}"));

    let extras: Vec<String> = evaluation
        .recommendations
        .iter()
        .take(MAX_EXTRA_RECOMMENDATIONS)
        .map(|rec| format!("- {rec}"))
        .collect();
    if !extras.is_empty() {
        parts.push("\n**Additionally, keep in mind:**".to_string());
        parts.extend(extras);
    }

    if !evaluation.application_strategy.is_empty() {
        parts.push("\n**Application Strategy**".to_string());
        parts.push(evaluation.application_strategy.clone());
    }

    parts.push(
        "\nThese are our recommendations. You can now generate a tailored checklist or \
         discuss with our AI Consultant for file preparation."
            .to_string(),
    );

    parts.join("\n")
}

fn travel_line(answers: &AnswerBag) -> String {
    let travel = answers.value(FieldName::TravelHistory);
    let (countries, has_travel) = match travel {
        Some(FieldValue::List(items)) if !items.is_empty() => (
            items
                .iter()
                .take(MAX_TRAVEL_COUNTRIES)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
            true,
        ),
        Some(FieldValue::Text(s)) if !s.trim().is_empty() => {
            let parsed = super::features::parse_travel_countries(&FieldValue::Text(s.clone()));
            if parsed.is_empty() {
                (String::new(), false)
            } else {
                (s.trim().to_string(), true)
            }
        }
        _ => (String::new(), false),
    };

    if !has_travel {
        return "You don't appear to have international travel history yet; that can reduce \
                early approval odds unless other areas are strong."
            .to_string();
    }

    let last_year = answers.value(FieldName::LastTravelYear).and_then(|v| match v {
        FieldValue::Number(n) => Some(n.to_string()),
        FieldValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    });

    match last_year {
        Some(year) => format!(
            "You have a reasonable travel history (e.g., {countries}) and your last trip \
             was in {year}."
        ),
        None => format!("You have a reasonable travel history (e.g., {countries})."),
    }
}

fn ties_line(answers: &AnswerBag) -> String {
    let mut fragments: Vec<String> = Vec::new();

    if let Some(profession) = answers
        .value(FieldName::Profession)
        .and_then(|v| v.as_text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let business_type = answers
            .value(FieldName::BusinessType)
            .and_then(|v| v.as_text())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match business_type {
            Some(kind) => fragments.push(format!("Profile: {profession} ({kind}).")),
            None => fragments.push(format!("Profile: {profession}.")),
        }
    }

    match answers.value(FieldName::AnnualIncome) {
        Some(FieldValue::Number(income)) => {
            fragments.push(format!("Tax-declared income ~ {income} PKR."));
        }
        Some(FieldValue::Text(s)) if !s.trim().is_empty() => {
            fragments.push(format!("Declared income: {}.", s.trim()));
        }
        _ => {}
    }

    match answers.value(FieldName::ClosingBalance) {
        Some(FieldValue::Number(balance)) if *balance > 0 => {
            fragments.push(format!("Bank balance around {balance} PKR."));
        }
        Some(FieldValue::Flag(true)) => {
            fragments.push("You can maintain the required closing balance.".to_string());
        }
        _ => {}
    }

    let mut line = "On documentation, show strong ties with your homeland to ensure visa \
                    success."
        .to_string();
    if !fragments.is_empty() {
        line.push(' ');
        line.push_str(&fragments.join(" "));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evaluation::{normalize_answers, score_features};

    fn answered_bag() -> AnswerBag {
        let mut bag = AnswerBag::new();
        bag.record_direct(FieldName::Country, "Germany".into(), 1.0);
        bag.record_direct(FieldName::Profession, "business person".into(), 1.0);
        bag.record_direct(FieldName::BusinessType, "sole proprietor".into(), 1.0);
        bag.record_direct(FieldName::TaxFiler, true.into(), 1.0);
        bag.record_direct(FieldName::AnnualIncome, FieldValue::Number(1_500_000), 1.0);
        bag.record_direct(FieldName::ClosingBalance, FieldValue::Number(2_000_000), 1.0);
        bag.record_direct(
            FieldName::TravelHistory,
            FieldValue::List(vec!["USA".into(), "Dubai".into()]),
            1.0,
        );
        bag.record_direct(FieldName::LastTravelYear, FieldValue::Number(2023), 1.0);
        bag.record_direct(FieldName::Age, FieldValue::Number(35), 1.0);
        bag
    }

    fn evaluation_for(bag: &AnswerBag) -> Evaluation {
        score_features(&normalize_answers(bag, 2026))
    }

    #[test]
    fn names_the_target_country_in_the_intro() {
        let bag = answered_bag();
        let text = build_narrative(&evaluation_for(&bag), &bag);
        assert!(text.contains("assessment for Germany"));
    }

    #[test]
    fn falls_back_silently_without_a_country() {
        let mut bag = answered_bag();
        bag.clear();
        let text = build_narrative(&evaluation_for(&bag), &bag);
        assert!(text.contains("here's our assessment:"));
        assert!(!text.contains("assessment for"));
    }

    #[test]
    fn includes_the_banded_success_ratio() {
        let bag = answered_bag();
        let evaluation = evaluation_for(&bag);
        let text = build_narrative(&evaluation, &bag);
        assert!(text.contains(&format!("**Success Ratio:** {}%", evaluation.success_ratio)));
    }

    #[test]
    fn has_four_numbered_guidance_lines() {
        let bag = answered_bag();
        let text = build_narrative(&evaluation_for(&bag), &bag);
        for marker in ["1. ", "2. ", "3. ", "4. "] {
            assert!(text.contains(marker), "missing {marker}");
        }
    }

    #[test]
    fn travel_line_mentions_countries_and_year() {
        let bag = answered_bag();
        let text = build_narrative(&evaluation_for(&bag), &bag);
        assert!(text.contains("USA, Dubai"));
        assert!(text.contains("last trip was in 2023"));
    }

    #[test]
    fn zero_travel_history_changes_the_phrasing() {
        let mut bag = answered_bag();
        bag.record_direct(FieldName::TravelHistory, "no travel history".into(), 1.0);
        let text = build_narrative(&evaluation_for(&bag), &bag);
        assert!(text.contains("don't appear to have international travel history"));
    }

    #[test]
    fn extra_recommendations_are_capped_at_four() {
        let mut bag = answered_bag();
        bag.clear();
        let evaluation = evaluation_for(&bag);
        assert!(evaluation.recommendations.len() > MAX_EXTRA_RECOMMENDATIONS);

        let text = build_narrative(&evaluation, &bag);
        let bullets = text.lines().filter(|line| line.starts_with("- ")).count();
        assert_eq!(bullets, MAX_EXTRA_RECOMMENDATIONS);
    }

    #[test]
    fn ties_line_lists_available_profile_facts() {
        let bag = answered_bag();
        let text = build_narrative(&evaluation_for(&bag), &bag);
        assert!(text.contains("Profile: business person (sole proprietor)."));
        assert!(text.contains("Tax-declared income ~ 1500000 PKR."));
        assert!(text.contains("Bank balance around 2000000 PKR."));
    }

    #[test]
    fn ends_with_the_call_to_action() {
        let bag = answered_bag();
        let text = build_narrative(&evaluation_for(&bag), &bag);
        assert!(text.trim_end().ends_with("file preparation."));
    }
}
