//! The answer bag - facts collected from the applicant.
//!
//! Each fact is a named field with a value, a confidence, and a provenance
//! tag. The bag preserves insertion order so the interview transcript can be
//! replayed in the order facts were learned.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence at or above which an answer is considered accepted.
///
/// An accepted answer is never silently overwritten by a lower-confidence
/// candidate for the same field; only a direct answer to that field's own
/// question may replace it.
pub const ACCEPTANCE_CONFIDENCE: f64 = 0.7;

/// The closed vocabulary of interview fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Country,
    Profession,
    BusinessType,
    Salary,
    SalaryMode,
    TaxFiler,
    AnnualIncome,
    ClosingBalance,
    TravelHistory,
    LastTravelYear,
    ValidVisa,
    SchengenRejection,
    Age,
    BusinessPremises,
    BusinessAssets,
    BusinessOnlinePresence,
}

impl FieldName {
    /// Returns the snake_case wire name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Country => "country",
            FieldName::Profession => "profession",
            FieldName::BusinessType => "business_type",
            FieldName::Salary => "salary",
            FieldName::SalaryMode => "salary_mode",
            FieldName::TaxFiler => "tax_filer",
            FieldName::AnnualIncome => "annual_income",
            FieldName::ClosingBalance => "closing_balance",
            FieldName::TravelHistory => "travel_history",
            FieldName::LastTravelYear => "last_travel_year",
            FieldName::ValidVisa => "valid_visa",
            FieldName::SchengenRejection => "schengen_rejection",
            FieldName::Age => "age",
            FieldName::BusinessPremises => "business_premises",
            FieldName::BusinessAssets => "business_assets",
            FieldName::BusinessOnlinePresence => "business_online_presence",
        }
    }

    /// Parses a wire name back into a field, if recognized.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "country" => FieldName::Country,
            "profession" => FieldName::Profession,
            "business_type" => FieldName::BusinessType,
            "salary" => FieldName::Salary,
            "salary_mode" => FieldName::SalaryMode,
            "tax_filer" => FieldName::TaxFiler,
            "annual_income" => FieldName::AnnualIncome,
            "closing_balance" => FieldName::ClosingBalance,
            "travel_history" => FieldName::TravelHistory,
            "last_travel_year" => FieldName::LastTravelYear,
            "valid_visa" => FieldName::ValidVisa,
            "schengen_rejection" => FieldName::SchengenRejection,
            "age" => FieldName::Age,
            "business_premises" => FieldName::BusinessPremises,
            "business_assets" => FieldName::BusinessAssets,
            "business_online_presence" => FieldName::BusinessOnlinePresence,
            _ => return None,
        })
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A field value as captured from the applicant or the extractor.
///
/// `Structured` carries shapes the closed variants cannot express, such as
/// the `{has_rejection, year}` rejection record; downstream normalization
/// treats unrecognized structures as unknown rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(i64),
    List(Vec<String>),
    Text(String),
    Structured(serde_json::Value),
}

impl FieldValue {
    /// Returns the inner text, if this value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean, if this value is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the inner integer, if this value is numeric.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the inner list, if this value is a list of strings.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

/// How an answer entered the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the NL extractor from a free-text utterance.
    Extracted,
    /// The applicant answered the field's own question directly.
    DirectAnswer,
}

/// A single answered field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredField {
    pub name: FieldName,
    pub value: FieldValue,
    pub confidence: f64,
    pub provenance: Provenance,
}

/// Insertion-ordered collection of answered fields, one entry per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerBag {
    entries: Vec<AnsweredField>,
}

impl AnswerBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for a field, if answered.
    pub fn get(&self, name: FieldName) -> Option<&AnsweredField> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Returns the value for a field, if answered.
    pub fn value(&self, name: FieldName) -> Option<&FieldValue> {
        self.get(name).map(|entry| &entry.value)
    }

    /// Returns true if the field has been answered.
    pub fn contains(&self, name: FieldName) -> bool {
        self.get(name).is_some()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AnsweredField> {
        self.entries.iter()
    }

    /// Number of answered fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no fields have been answered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every answer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Merges an extracted candidate, honoring the acceptance invariant.
    ///
    /// An existing accepted answer (confidence >= [`ACCEPTANCE_CONFIDENCE`])
    /// or direct answer is kept when the candidate is less confident.
    /// Returns true if the candidate was stored.
    pub fn merge_candidate(&mut self, name: FieldName, value: FieldValue, confidence: f64) -> bool {
        let confidence = confidence.clamp(0.0, 1.0);
        if let Some(existing) = self.get(name) {
            let protected = existing.confidence >= ACCEPTANCE_CONFIDENCE
                || existing.provenance == Provenance::DirectAnswer;
            if protected && confidence < existing.confidence {
                return false;
            }
        }
        self.upsert(AnsweredField {
            name,
            value,
            confidence,
            provenance: Provenance::Extracted,
        });
        true
    }

    /// Records a direct answer to the field's own question.
    ///
    /// Direct answers always win: an explicit correction replaces whatever
    /// was previously stored, regardless of confidence.
    pub fn record_direct(&mut self, name: FieldName, value: FieldValue, confidence: f64) {
        self.upsert(AnsweredField {
            name,
            value,
            confidence: confidence.clamp(0.0, 1.0),
            provenance: Provenance::DirectAnswer,
        });
    }

    fn upsert(&mut self, field: AnsweredField) {
        match self.entries.iter_mut().find(|entry| entry.name == field.name) {
            Some(existing) => *existing = field,
            None => self.entries.push(field),
        }
    }
}
