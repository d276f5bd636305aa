//! Scoring rubric - weighted sub-scores, banding, and hard caps.
//!
//! The rubric is a total function: any feature set produces an evaluation.
//! Sub-scores are summed, clamped to 0-100, banded into one of four display
//! ratios, and finally subjected to two asymmetric caps that can only lower
//! the ratio. The cap order is observable behavior and must not change.

use serde::{Deserialize, Serialize};

use super::features::NormalizedFeatures;

/// Raw-score thresholds that separate the four display bands.
const BAND_THRESHOLDS: (i64, i64, i64) = (40, 60, 80);

/// Display label for evaluation confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::High => "High",
            ConfidenceLabel::Medium => "Medium",
            ConfidenceLabel::Low => "Low",
        }
    }
}

/// The final assessment of an applicant profile.
///
/// Created exactly once per completed interview; immutable afterwards
/// unless the session is reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Banded success ratio: one of 30, 50, 70, 90.
    pub success_ratio: u8,
    pub overall_recommendation: String,
    pub confidence_level: ConfidenceLabel,
    pub matched_scenario: String,
    pub strengths: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub application_strategy: String,
    pub required_documents: Vec<String>,
    /// Heuristic confidence in the assessment itself, 0.3-0.95.
    pub confidence: f64,
    pub should_apply: bool,
}

fn score_ties(feat: &NormalizedFeatures) -> (i64, Vec<String>) {
    let mut score = 0;
    let mut strengths = Vec::new();

    if feat.business_premises == Some(true) {
        score += 20;
        strengths.push("Physical office/shop/warehouse with employees".to_string());
    }

    if feat.business_online_presence == Some(true) {
        score += 10;
        strengths.push("Digital presence (website/Facebook)".to_string());
    }

    if feat.business_assets == Some(true) {
        score += 10;
        strengths.push("Manufacturing/inventory/agricultural assets".to_string());
    } else if feat.business_premises == Some(true) && feat.business_type.is_some() {
        score += 10;
        strengths.push("Business footprint/inventory inferred from premises and type".to_string());
    }

    // Employment profiles cannot demonstrate business ties; cap them low.
    if !feat.is_business {
        score = score.min(10);
    }

    (score, strengths)
}

fn score_travel(feat: &NormalizedFeatures) -> (i64, Vec<String>, Vec<String>) {
    let mut score = 0;
    let mut strengths = Vec::new();
    let mut risks = Vec::new();

    match feat.travel_count {
        count if count >= 3 => {
            score += 15;
            strengths.push("3+ international trips".to_string());
        }
        2 => {
            score += 10;
            strengths.push("2 international trips".to_string());
        }
        1 => {
            score += 5;
            strengths.push("1 international trip".to_string());
        }
        _ => risks.push("No previous international travel".to_string()),
    }

    let years = feat.years_since_last_travel.unwrap_or(99);
    if years <= 2 {
        score += 10;
        strengths.push("Recent travel within 2 years".to_string());
    } else if years <= 5 {
        score += 7;
        strengths.push("Travel within last 3-5 years".to_string());
    } else if years <= 10 {
        score += 3;
        strengths.push("Travel 6-10 years ago".to_string());
    } else {
        risks.push("Last international travel older than 10 years or unknown".to_string());
    }

    if feat.has_heavy_visa == Some(true) || feat.has_schengen_travel {
        if years <= 2 {
            score += 10;
            strengths.push("Top-tier/Schengen visa with recent travel".to_string());
        } else if years <= 5 {
            score += 7;
            strengths.push("Top-tier/Schengen visa within 3-5 years".to_string());
        } else if years <= 10 {
            score += 3;
            strengths.push("Top-tier/Schengen visa within 6-10 years".to_string());
        } else {
            score += 1;
            strengths.push("Historic top-tier/Schengen visa (>10 years)".to_string());
        }
    }

    (score, strengths, risks)
}

fn score_financials(feat: &NormalizedFeatures) -> (i64, Vec<String>, Vec<String>) {
    let mut score = 0;
    let mut strengths = Vec::new();
    let mut risks = Vec::new();

    let balance = feat.closing_balance_pk;
    if balance >= 2_000_000 {
        score += 12;
        strengths.push("Closing balance >= 2M PKR".to_string());
    } else if balance >= 1_500_000 {
        score += 6;
        strengths.push("Closing balance 1.5-2M PKR".to_string());
        risks.push("Closing balance below 2M PKR threshold".to_string());
    } else if balance >= 1_000_000 {
        score += 2;
        strengths.push("Closing balance 1-1.5M PKR".to_string());
        risks.push("Closing balance below 2M PKR threshold".to_string());
    } else {
        risks.push("Insufficient or unknown closing balance".to_string());
    }

    let income = feat.annual_income_pk;
    let mut income_sub = 0;
    if income >= 1_200_000 {
        income_sub = 8;
        strengths.push("Annual income >= 1.2M PKR (tax-declared)".to_string());
    } else if income >= 800_000 {
        income_sub = 4;
        strengths.push("Annual income 0.8-1.2M PKR (tax-declared)".to_string());
        risks.push("Income below 1.2M PKR ideal threshold".to_string());
    } else if income >= 500_000 {
        income_sub = 2;
        strengths.push("Annual income 0.5-0.8M PKR (tax-declared)".to_string());
        risks.push("Income below 1.2M PKR ideal threshold".to_string());
    } else {
        risks.push("Low or unknown annual income".to_string());
    }

    // Undeclared income earns half credit, truncated.
    if feat.is_tax_filer == Some(false) {
        income_sub /= 2;
        risks.push("Not a tax filer (reduced credit for income)".to_string());
    }
    score += income_sub;

    (score, strengths, risks)
}

fn score_age(feat: &NormalizedFeatures) -> (i64, Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut risks = Vec::new();
    let score = match feat.age {
        Some(age) if age > 30 => {
            strengths.push("Age > 30 (maturity)".to_string());
            5
        }
        Some(age) if age >= 25 => {
            strengths.push("Age 25-30 (acceptable)".to_string());
            3
        }
        Some(age) if age >= 0 => {
            risks.push("Age < 25 (higher scrutiny)".to_string());
            0
        }
        _ => 0,
    };
    (score, strengths, risks)
}

fn penalties(feat: &NormalizedFeatures) -> (i64, Vec<String>) {
    let mut penalty = 0;
    let mut risks = Vec::new();

    if feat.previous_schengen_rejection == Some(true) {
        let years = feat.previous_schengen_rejection_years_ago.unwrap_or(99);
        if years <= 2 {
            penalty += 20;
            risks.push("Schengen rejection in last 2 years".to_string());
        } else if years <= 5 {
            penalty += 15;
            risks.push("Schengen rejection 3-5 years ago".to_string());
        } else if years <= 10 {
            penalty += 10;
            risks.push("Schengen rejection 6-10 years ago".to_string());
        } else {
            penalty += 8;
            risks.push("Historic Schengen rejection (>10 years)".to_string());
        }
    }

    (penalty, risks)
}

fn banded_ratio(raw_score: i64) -> u8 {
    let (low, mid, high) = BAND_THRESHOLDS;
    if raw_score >= high {
        90
    } else if raw_score >= mid {
        70
    } else if raw_score >= low {
        50
    } else {
        30
    }
}

/// Applies the post-banding hard caps, in their fixed order.
///
/// Both caps only ever lower the ratio.
fn apply_caps(mut success_ratio: u8, feat: &NormalizedFeatures) -> u8 {
    if feat.closing_balance_pk < 2_000_000 {
        success_ratio = success_ratio.min(50);
    }

    if matches!(feat.age, Some(age) if age < 25)
        && feat.travel_count < 2
        && feat.business_premises != Some(true)
    {
        success_ratio = success_ratio.min(40);
    }

    success_ratio
}

fn assessment_confidence(feat: &NormalizedFeatures) -> f64 {
    let mut missing = 0;
    if feat.closing_balance_pk == 0 {
        missing += 1;
    }
    if feat.annual_income_pk == 0 {
        missing += 1;
    }
    if feat.travel_count == 0 && feat.years_since_last_travel.is_none() {
        missing += 1;
    }
    if feat.business_premises.is_none() {
        missing += 1;
    }
    if feat.is_tax_filer.is_none() {
        missing += 1;
    }
    (0.8 - 0.1 * missing as f64).clamp(0.3, 0.95)
}

fn recommendations(feat: &NormalizedFeatures) -> Vec<String> {
    let mut recs: Vec<String> = Vec::new();

    if !feat.has_schengen_travel && feat.has_heavy_visa != Some(true) {
        recs.push(
            "Apply for a Business visa for your first Schengen attempt; avoid \
             Germany/France/Italy initially; consider Belgium/Netherlands/Norway/Spain."
                .to_string(),
        );
    }

    if feat.travel_count < 2 || feat.years_since_last_travel.unwrap_or(99) > 5 {
        recs.push(
            "Build or refresh travel history (consider Turkey, Malaysia, Singapore, Japan, UAE)."
                .to_string(),
        );
    }

    if feat.closing_balance_pk < 2_000_000 {
        recs.push("Increase closing balance to >= 2M PKR to improve approval chances.".to_string());
    }
    if feat.annual_income_pk < 1_200_000 {
        recs.push("Strengthen declared annual income and ensure tax compliance.".to_string());
    }
    if feat.is_tax_filer == Some(false) {
        recs.push("File taxes and prepare recent returns.".to_string());
    }

    if feat.business_premises != Some(true) {
        recs.push(
            "Document physical business ties (lease, utility bills, payroll, photos of premises)."
                .to_string(),
        );
    }
    if feat.business_online_presence != Some(true) {
        recs.push(
            "Establish digital presence (website/social) to validate business existence."
                .to_string(),
        );
    }

    recs.push(
        "Have a verifiable purpose (invitation, event, exhibition) and align itinerary \
         accordingly."
            .to_string(),
    );

    if feat.previous_schengen_rejection == Some(true) {
        recs.push(
            "Address previous refusal clearly; provide stronger evidence and coherent travel \
             purpose."
                .to_string(),
        );
    }

    // Deduplicate preserving first-seen order.
    let mut seen = std::collections::HashSet::new();
    recs.retain(|rec| seen.insert(rec.clone()));
    recs
}

fn application_strategy(success_ratio: u8) -> String {
    if success_ratio >= 80 {
        "Proceed with application; ensure complete documentation and clear purpose; book \
         appointment and prepare via our portal."
            .to_string()
    } else if success_ratio >= 60 {
        "Apply with proper preparation; reinforce weaker areas and use a strong business \
         purpose/invitation."
            .to_string()
    } else if success_ratio >= 40 {
        "Consider improving travel history/financials first, or apply only with a solid \
         business invitation and strong ties."
            .to_string()
    } else {
        "Not recommended at this stage; build travel history and strengthen business/financial \
         ties before applying."
            .to_string()
    }
}

fn overall_recommendation(success_ratio: u8) -> &'static str {
    if success_ratio >= 80 {
        "Strong approval likelihood - Proceed with application"
    } else if success_ratio >= 60 {
        "Good approval likelihood - Apply with proper preparation"
    } else if success_ratio >= 40 {
        "Moderate approval likelihood - Consider improvements first"
    } else {
        "Low approval likelihood - Build profile before applying"
    }
}

fn confidence_label(success_ratio: u8) -> ConfidenceLabel {
    if success_ratio >= 80 {
        ConfidenceLabel::High
    } else if success_ratio >= 40 {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}

fn required_documents() -> Vec<String> {
    [
        "Passport (first and second page)",
        "CNIC (front and back)",
        "FRC or MRC",
        "NTN Registration",
        "Tax Returns (last 2 years)",
        "Bank Statement (3 months)",
        "Bank Maintenance Letter",
        "Business Website/Social Links",
        "Travel Itinerary/Invitations",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Scores a normalized profile into a final evaluation.
///
/// Total and deterministic: equal features always yield equal evaluations.
pub fn score_features(feat: &NormalizedFeatures) -> Evaluation {
    let (ties, tie_strengths) = score_ties(feat);
    let (travel, travel_strengths, travel_risks) = score_travel(feat);
    let (financials, fin_strengths, fin_risks) = score_financials(feat);
    let (age_score, age_strengths, age_risks) = score_age(feat);
    let (penalty, penalty_risks) = penalties(feat);

    let raw_score = (ties + travel + financials + age_score - penalty).clamp(0, 100);

    let success_ratio = apply_caps(banded_ratio(raw_score), feat);

    let mut strengths = tie_strengths;
    strengths.extend(travel_strengths);
    strengths.extend(fin_strengths);
    strengths.extend(age_strengths);

    let mut risk_factors = travel_risks;
    risk_factors.extend(fin_risks);
    risk_factors.extend(age_risks);
    risk_factors.extend(penalty_risks);

    tracing::debug!(
        raw_score,
        ties,
        travel,
        financials,
        age_score,
        penalty,
        success_ratio,
        "scored applicant profile"
    );

    Evaluation {
        success_ratio,
        overall_recommendation: overall_recommendation(success_ratio).to_string(),
        confidence_level: confidence_label(success_ratio),
        matched_scenario: "Rubric-Based Evaluation".to_string(),
        strengths,
        risk_factors,
        recommendations: recommendations(feat),
        application_strategy: application_strategy(success_ratio),
        required_documents: required_documents(),
        confidence: assessment_confidence(feat),
        should_apply: success_ratio >= 60,
    }
}
