//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::env;
use tracing::{debug, info, warn};

use super::base::HttpClientBase;
use crate::config::ProviderConfig;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::traits::CompletionProvider;
use crate::infrastructure::model::types::{
    CompletionRequest, CompletionResponse, ModelError, RequestedCall, ResponseFormat,
};

const PROVIDER_ID: &str = "gemini";

/// Gemini client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base: HttpClientBase::new(PROVIDER_ID.to_string(), endpoint.into(), api_key),
            api_path: DEFAULT_GEMINI_API_PATH.to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &ProviderConfig, model: &str) -> Self {
        let api_key = resolve_api_key(PROVIDER_ID, config.api_key.as_deref());
        let mut client = Self::new(config.endpoint.clone(), api_key, model);
        if let Some(path) = &config.api_path {
            client.api_path = path.clone();
        }
        client
    }

    fn build_model_url(&self) -> String {
        self.base
            .build_url(&format!("{}/{}:generateContent", self.api_path, self.model))
    }

    fn build_payload(request: &CompletionRequest) -> Value {
        let mut payload = json!({
            "contents": MessageAdapter::to_gemini_contents(&request.history),
        });

        if let Some(system) = &request.system_prompt {
            payload["system_instruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        if let Some(tools) = MessageAdapter::to_gemini_tools(&request.tools) {
            payload["tools"] = tools;
        }

        let mut generation = Map::new();
        if request.response_format == ResponseFormat::Json {
            generation.insert("responseMimeType".into(), json!("application/json"));
        }
        if let Some(limit) = request.max_output_tokens {
            generation.insert("maxOutputTokens".into(), json!(limit));
        }
        if !generation.is_empty() {
            payload["generationConfig"] = Value::Object(generation);
        }

        payload
    }
}

/// Resolve API key from the environment variable named in config
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn submit(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError> {
        let url = self.build_model_url();
        let payload = Self::build_payload(&request);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            turns = request.history.len(),
            tools = request.tools.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_with_query_key(&url, &payload).await?;
        let response = response.into_completion(&self.base.id)?;
        debug!(
            calls = response.function_calls.len(),
            has_text = response.text.is_some(),
            "Received response from Gemini"
        );
        Ok(response)
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    id: Option<String>,
    name: Option<String>,
    args: Option<Map<String, Value>>,
}

impl GeminiResponse {
    fn into_completion(self, provider: &str) -> Result<CompletionResponse, ModelError> {
        let candidate = self
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response(provider, "missing candidates"))?;

        let mut text: Option<String> = None;
        let mut function_calls = Vec::new();
        for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(call) = part.function_call {
                function_calls.push(RequestedCall {
                    id: call.id,
                    name: call.name,
                    args: call.args,
                });
                continue;
            }
            if part.thought {
                continue;
            }
            if let Some(chunk) = part.text {
                text.get_or_insert_with(String::new).push_str(&chunk);
            }
        }

        Ok(CompletionResponse {
            text,
            function_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConversationTurn;
    use crate::infrastructure::model::types::FunctionDeclaration;

    #[test]
    fn payload_carries_json_mode_and_token_limit() {
        let request = CompletionRequest {
            system_prompt: Some("classify".into()),
            history: vec![ConversationTurn::user("hello")],
            tools: Vec::new(),
            response_format: ResponseFormat::Json,
            max_output_tokens: Some(100),
        };

        let payload = GeminiClient::build_payload(&request);

        assert_eq!(payload["system_instruction"]["parts"][0]["text"], "classify");
        assert_eq!(payload["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(payload["generationConfig"]["maxOutputTokens"], 100);
        assert!(payload.get("tools").is_none());
    }

    #[test]
    fn payload_declares_tools_without_generation_config() {
        let request = CompletionRequest {
            tools: vec![FunctionDeclaration {
                name: "search_knowledge".into(),
                description: Some("Search".into()),
                parameters: Some(json!({"type": "object"})),
            }],
            ..CompletionRequest::default()
        };

        let payload = GeminiClient::build_payload(&request);

        assert_eq!(
            payload["tools"][0]["functionDeclarations"][0]["name"],
            "search_knowledge"
        );
        assert!(payload.get("generationConfig").is_none());
        assert!(payload.get("system_instruction").is_none());
    }

    #[test]
    fn response_splits_text_and_function_calls() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "thinking", "thought": true},
                        {"text": "{\"type\":"},
                        {"text": "\"response\"}"},
                        {"functionCall": {"name": "search_knowledge", "args": {"query": "x"}}}
                    ]
                }
            }]
        });
        let parsed: GeminiResponse = serde_json::from_value(raw).expect("decodes");
        let completion = parsed.into_completion("gemini").expect("has candidate");

        assert_eq!(completion.text.as_deref(), Some("{\"type\":\"response\"}"));
        assert_eq!(completion.function_calls.len(), 1);
        assert_eq!(
            completion.function_calls[0].name.as_deref(),
            Some("search_knowledge")
        );
        assert!(completion.function_calls[0].id.is_none());
    }

    #[test]
    fn response_without_candidates_is_invalid() {
        let parsed: GeminiResponse =
            serde_json::from_value(json!({"candidates": []})).expect("decodes");
        assert!(matches!(
            parsed.into_completion("gemini"),
            Err(ModelError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn url_includes_model_and_api_path() {
        let client = GeminiClient::new("https://example.com/", None, "gemini-2.5-flash");
        assert_eq!(
            client.build_model_url(),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
