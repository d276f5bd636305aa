//! LLM-backed field extractor.
//!
//! Prompts the model with the pending question and the utterance, expecting
//! a JSON array of field candidates. Anything unparseable degrades to an
//! empty candidate list at the call site; the engine's light parsing keeps
//! the interview moving.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::conversation::{FieldCandidate, InterviewStage};
use crate::domain::session::{FieldName, FieldValue};
use crate::ports::{ExtractorError, FieldExtractor};

use super::openai_client::{OpenAiClient, OpenAiClientError};

const SYSTEM_PROMPT: &str = "You extract structured facts from a visa applicant's chat \
message. Respond with ONLY a JSON array; each element is \
{\"name\": <field>, \"value\": <string|number|boolean|list>, \"confidence\": <0.0-1.0>}. \
Known fields: country, profession, business_type, salary, salary_mode, tax_filer, \
annual_income, closing_balance, travel_history, last_travel_year, valid_visa, \
schengen_rejection, age, business_premises, business_assets, business_online_presence. \
Only include fields the message actually states. Return [] when nothing is stated.";

/// Field extractor backed by an OpenAI-compatible completion API.
pub struct OpenAiFieldExtractor {
    client: OpenAiClient,
}

impl OpenAiFieldExtractor {
    /// Creates an extractor over the given client.
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    fn user_prompt(stage: InterviewStage, utterance: &str) -> String {
        format!(
            "The applicant was asked: \"{}\"\nThey replied: \"{}\"",
            stage.question(),
            utterance
        )
    }
}

#[async_trait]
impl FieldExtractor for OpenAiFieldExtractor {
    async fn extract(
        &self,
        stage: InterviewStage,
        utterance: &str,
    ) -> Result<Vec<FieldCandidate>, ExtractorError> {
        let reply = self
            .client
            .complete(SYSTEM_PROMPT, &Self::user_prompt(stage, utterance), 0.0)
            .await
            .map_err(|e| match e {
                OpenAiClientError::Timeout { timeout_secs } => {
                    ExtractorError::Timeout { timeout_secs }
                }
                other => ExtractorError::Unavailable(other.to_string()),
            })?;

        parse_candidates(&reply)
    }
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    name: String,
    value: serde_json::Value,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

/// Parses the model reply into candidates, skipping unknown field names.
fn parse_candidates(reply: &str) -> Result<Vec<FieldCandidate>, ExtractorError> {
    let json = extract_json_array(reply)
        .ok_or_else(|| ExtractorError::MalformedResponse("no JSON array found".to_string()))?;

    let raw: Vec<RawCandidate> = serde_json::from_str(json)
        .map_err(|e| ExtractorError::MalformedResponse(e.to_string()))?;

    let mut candidates = Vec::with_capacity(raw.len());
    for candidate in raw {
        let Some(name) = FieldName::parse(&candidate.name) else {
            tracing::debug!(field = %candidate.name, "extractor produced unknown field; skipped");
            continue;
        };
        let value: FieldValue = match serde_json::from_value(candidate.value) {
            Ok(value) => value,
            Err(_) => continue,
        };
        candidates.push(FieldCandidate {
            name,
            value,
            confidence: candidate.confidence.clamp(0.0, 1.0),
        });
    }
    Ok(candidates)
}

/// Locates the outermost JSON array, tolerating markdown fences and prose.
fn extract_json_array(reply: &str) -> Option<&str> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}
