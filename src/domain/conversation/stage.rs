//! Interview stages and their question texts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;
use crate::domain::session::FieldName;

/// The stage of the eligibility interview.
///
/// Stages flow linearly with two branch points and several conditional
/// skips:
///
/// ```text
/// AskCountry → AskProfession → {AskBusinessType | AskSalary → AskSalaryMode}
///   → AskTaxInfo → AskBalance → AskTravel → [AskLastTravelYear]
///   → [AskValidVisa] → AskSchengenRejection → AskAge
///   → [AskBusinessPremises → AskBusinessAssets → AskBusinessOnlinePresence]
///   → Evaluation → Complete
/// ```
///
/// `CountryNotSupported` is a side stage reachable from `AskCountry`; it
/// returns to `AskCountry` when the applicant wants to explore Schengen
/// options, or exits to `Complete` when they decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStage {
    AskCountry,
    CountryNotSupported,
    AskProfession,
    AskBusinessType,
    AskSalary,
    AskSalaryMode,
    AskTaxInfo,
    AskBalance,
    AskTravel,
    AskLastTravelYear,
    AskValidVisa,
    AskSchengenRejection,
    AskAge,
    AskBusinessPremises,
    AskBusinessAssets,
    AskBusinessOnlinePresence,
    Evaluation,
    Complete,
}

impl InterviewStage {
    /// The stage every new session starts in.
    pub fn initial() -> Self {
        InterviewStage::AskCountry
    }

    /// The answer field this stage's question is collecting, if any.
    pub fn expected_field(&self) -> Option<FieldName> {
        use InterviewStage::*;
        Some(match self {
            AskCountry => FieldName::Country,
            AskProfession => FieldName::Profession,
            AskBusinessType => FieldName::BusinessType,
            AskSalary => FieldName::Salary,
            AskSalaryMode => FieldName::SalaryMode,
            AskTaxInfo => FieldName::TaxFiler,
            AskBalance => FieldName::ClosingBalance,
            AskTravel => FieldName::TravelHistory,
            AskLastTravelYear => FieldName::LastTravelYear,
            AskValidVisa => FieldName::ValidVisa,
            AskSchengenRejection => FieldName::SchengenRejection,
            AskAge => FieldName::Age,
            AskBusinessPremises => FieldName::BusinessPremises,
            AskBusinessAssets => FieldName::BusinessAssets,
            AskBusinessOnlinePresence => FieldName::BusinessOnlinePresence,
            CountryNotSupported | Evaluation | Complete => return None,
        })
    }

    /// Returns true if this stage poses a question to the applicant.
    pub fn is_question(&self) -> bool {
        !matches!(self, InterviewStage::Evaluation | InterviewStage::Complete)
    }

    /// The question text presented to the applicant in this stage.
    pub fn question(&self) -> &'static str {
        use InterviewStage::*;
        match self {
            AskCountry => "Which country visa are you interested to apply for?",
            CountryNotSupported => {
                "We currently assess Schengen visas only. Would you like to explore \
                 a Schengen country instead?"
            }
            AskProfession => "Are you a business person or a job holder?",
            AskBusinessType => "Are you a sole proprietor or is it a Private Limited company?",
            AskSalary => "What is your current salary?",
            AskSalaryMode => {
                "Is your salary transferred to your bank account or do you receive it in cash?"
            }
            AskTaxInfo => {
                "Are you a tax filer? If yes, what was your annual income in the last tax return?"
            }
            AskBalance => "Can you manage a closing balance of 2 million PKR?",
            AskTravel => "What is your previous travel history in the last 5 years?",
            AskLastTravelYear => "Which year was your last international travel?",
            AskValidVisa => {
                "Do you currently hold a valid visa for the USA, UK, Canada, or Australia?"
            }
            AskSchengenRejection => {
                "Have you ever had a Schengen visa rejection? If yes, in which year?"
            }
            AskAge => "What is your age?",
            AskBusinessPremises => {
                "Do you have a physical business premises such as an office, shop, or warehouse?"
            }
            AskBusinessAssets => {
                "Does your business hold assets such as machinery, inventory, or \
                 agricultural holdings?"
            }
            AskBusinessOnlinePresence => {
                "Does your business have an online presence such as a website or Facebook page?"
            }
            Evaluation => "Evaluating your profile now.",
            Complete => {
                "Your visa evaluation is complete. Would you like to start a new evaluation?"
            }
        }
    }
}

impl Default for InterviewStage {
    fn default() -> Self {
        Self::initial()
    }
}

impl StateMachine for InterviewStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InterviewStage::*;
        match self {
            AskCountry => vec![AskProfession, CountryNotSupported],
            CountryNotSupported => vec![AskCountry, Complete],
            AskProfession => vec![AskBusinessType, AskSalary, AskTaxInfo],
            AskBusinessType => vec![AskTaxInfo],
            AskSalary => vec![AskSalaryMode],
            AskSalaryMode => vec![AskTaxInfo],
            AskTaxInfo => vec![AskBalance],
            AskBalance => vec![AskTravel],
            // No-travel answers skip both follow-ups; travel without a
            // heavy-visa country skips only the visa question.
            AskTravel => vec![AskLastTravelYear, AskValidVisa, AskSchengenRejection],
            AskLastTravelYear => vec![AskValidVisa, AskSchengenRejection],
            AskValidVisa => vec![AskSchengenRejection],
            AskSchengenRejection => vec![AskAge],
            AskAge => vec![AskBusinessPremises, Evaluation],
            AskBusinessPremises => vec![AskBusinessAssets],
            AskBusinessAssets => vec![AskBusinessOnlinePresence],
            AskBusinessOnlinePresence => vec![Evaluation],
            Evaluation => vec![Complete],
            Complete => vec![],
        }
    }
}
