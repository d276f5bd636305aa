//! HTTP DTOs for the chat endpoint.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::handlers::chat::ProcessTurnResult;
use crate::domain::evaluation::Evaluation;
use crate::domain::session::AnswerBag;

/// Request to process one chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Existing session id; omit to start a new conversation.
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

/// Response for a processed chat turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub message: String,
    pub state: String,
    pub answers: Map<String, Value>,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

/// Renders the answer bag as a plain field-to-value map.
pub(crate) fn answers_to_map(answers: &AnswerBag) -> Map<String, Value> {
    let mut map = Map::new();
    for entry in answers.iter() {
        let value = serde_json::to_value(&entry.value).unwrap_or(Value::Null);
        map.insert(entry.name.as_str().to_string(), value);
    }
    map
}

impl From<ProcessTurnResult> for ChatResponse {
    fn from(result: ProcessTurnResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            message: result.message,
            state: stage_name(&result.stage),
            answers: answers_to_map(&result.answers),
            is_complete: result.is_complete,
            evaluation: result.evaluation,
        }
    }
}

pub(crate) fn stage_name(stage: &crate::domain::conversation::InterviewStage) -> String {
    serde_json::to_value(stage)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{stage:?}"))
}

/// Error payload shared by the HTTP adapters.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::InterviewStage;
    use crate::domain::session::{FieldName, FieldValue};

    #[test]
    fn answers_map_preserves_wire_names_and_values() {
        let mut answers = AnswerBag::new();
        answers.record_direct(FieldName::Country, "Germany".into(), 1.0);
        answers.record_direct(FieldName::Age, FieldValue::Number(35), 1.0);

        let map = answers_to_map(&answers);
        assert_eq!(map["country"], "Germany");
        assert_eq!(map["age"], 35);
    }

    #[test]
    fn stage_names_use_snake_case() {
        assert_eq!(stage_name(&InterviewStage::AskBalance), "ask_balance");
        assert_eq!(
            stage_name(&InterviewStage::CountryNotSupported),
            "country_not_supported"
        );
    }

    #[test]
    fn request_accepts_missing_session_id() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(request.session_id.is_none());
        assert_eq!(request.message, "hi");
    }
}
