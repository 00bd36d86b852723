//! Structured replies expected from the two agents.

use super::errors::ResponseError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const AMBIGUOUS_INTENT: &str = "ambiguous";

/// Outcome of one classifier turn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawIntentResponse")]
pub enum IntentAgentResponse {
    ClarifyingQuestion { content: String },
    Ambiguous,
    Classified {
        recognized_intent: String,
        user_query: String,
    },
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawIntentResponse {
    ClarifyingQuestion {
        content: String,
    },
    IntentClassification {
        recognized_intent: String,
        #[serde(default)]
        user_query: Option<String>,
    },
}

impl TryFrom<RawIntentResponse> for IntentAgentResponse {
    type Error = String;

    fn try_from(raw: RawIntentResponse) -> Result<Self, Self::Error> {
        match raw {
            RawIntentResponse::ClarifyingQuestion { content } => {
                Ok(Self::ClarifyingQuestion { content })
            }
            RawIntentResponse::IntentClassification {
                recognized_intent, ..
            } if recognized_intent.trim() == AMBIGUOUS_INTENT => Ok(Self::Ambiguous),
            RawIntentResponse::IntentClassification {
                recognized_intent,
                user_query: Some(user_query),
            } => Ok(Self::Classified {
                recognized_intent,
                user_query,
            }),
            RawIntentResponse::IntentClassification {
                recognized_intent, ..
            } => Err(format!(
                "classification '{recognized_intent}' is missing 'user_query'"
            )),
        }
    }
}

impl IntentAgentResponse {
    /// Ambiguous and classified outcomes end a classification thread.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::ClarifyingQuestion { .. })
    }
}

/// Terminal answer of the task executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskAgentResponse {
    Response { content: String },
    IntentShiftDetected { reason: String },
    Error { message: String },
}

impl TaskAgentResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

pub fn parse_intent_response(raw: &str) -> Result<IntentAgentResponse, ResponseError> {
    decode(raw)
}

pub fn parse_task_response(raw: &str) -> Result<TaskAgentResponse, ResponseError> {
    decode(raw)
}

/// Two-step decode so "not JSON" and "wrong shape" stay distinguishable.
fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ResponseError> {
    let value: Value = serde_json::from_str(raw).map_err(ResponseError::Json)?;
    serde_json::from_value(value).map_err(ResponseError::Schema)
}
