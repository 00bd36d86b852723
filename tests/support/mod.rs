// Shared doubles for the routing tests.
#![allow(dead_code)]

use async_trait::async_trait;
use qna_core::agent::TaskObserver;
use qna_core::model::{
    CompletionProvider, CompletionRequest, CompletionResponse, ModelError, RequestedCall,
};
use qna_core::tooling::{
    CallToolResult, ProtocolClient, ReadResourceResult, RemoteTool, ToolInvokeError,
};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const INTENTS: &str = r#"[
    {"name": "faq", "description": "Answer questions using the knowledge base", "allowed_tools": ["search_knowledge"]},
    {"name": "create_record", "description": "Create a structured support record", "allowed_tools": ["create_record"]}
]"#;

pub const PERSONA: &str = r#"{"name": "Ada", "system_prompt": "You are Ada, a concise support assistant."}"#;

#[derive(Clone)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<Vec<CompletionResponse>>>,
    recordings: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn submit(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError> {
        self.recordings.lock().await.push(request);
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Err(ModelError::invalid_response("scripted", "script exhausted"));
        }
        Ok(responses.remove(0))
    }
}

#[derive(Clone, Default)]
pub struct StubProtocol {
    resources: HashMap<String, ReadResourceResult>,
    tools: Vec<RemoteTool>,
    results: HashMap<String, CallToolResult>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StubProtocol {
    /// Serves the default persona and intents plus two listed tools.
    pub fn configured() -> Self {
        Self::default()
            .with_resource("config://intents", INTENTS)
            .with_resource("config://persona", PERSONA)
            .with_tool("search_knowledge")
            .with_tool("create_record")
    }

    pub fn with_resource(mut self, uri: &str, text: &str) -> Self {
        self.resources
            .insert(uri.to_string(), ReadResourceResult::text(uri, text));
        self
    }

    pub fn with_tool(mut self, name: &str) -> Self {
        self.tools.push(RemoteTool {
            name: name.to_string(),
            description: Some(format!("{name} tool")),
            input_schema: Some(json!({"type": "object"})),
        });
        self
    }

    pub fn with_result(mut self, tool: &str, text: &str) -> Self {
        self.results
            .insert(tool.to_string(), CallToolResult::text(text));
        self
    }

    pub async fn tool_calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ProtocolClient for StubProtocol {
    async fn list_tools(&self) -> Result<Vec<RemoteTool>, ToolInvokeError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, ToolInvokeError> {
        self.calls.lock().await.push((name.to_string(), arguments));
        self.results
            .get(name)
            .cloned()
            .ok_or_else(|| ToolInvokeError::Rpc {
                server: "stub".into(),
                code: -32602,
                message: format!("unknown tool {name}"),
            })
    }

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ToolInvokeError> {
        self.resources
            .get(uri)
            .cloned()
            .ok_or_else(|| ToolInvokeError::Rpc {
                server: "stub".into(),
                code: -32002,
                message: format!("resource not found: {uri}"),
            })
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    events: std::sync::Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl TaskObserver for RecordingObserver {
    fn on_fetching_document(&self, uri: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(format!("fetching document {uri}"));
        }
    }

    fn on_calling_tool(&self, name: &str, arguments: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(format!("calling tool {name} {arguments}"));
        }
    }
}

pub fn text(raw: Value) -> CompletionResponse {
    CompletionResponse::text(raw.to_string())
}

pub fn respond(content: &str) -> CompletionResponse {
    text(json!({"type": "response", "content": content}))
}

pub fn clarify(question: &str) -> CompletionResponse {
    text(json!({"type": "clarifying_question", "content": question}))
}

pub fn classify(intent: &str, user_query: &str) -> CompletionResponse {
    text(json!({
        "type": "intent_classification",
        "recognized_intent": intent,
        "user_query": user_query
    }))
}

pub fn ambiguous() -> CompletionResponse {
    text(json!({"type": "intent_classification", "recognized_intent": "ambiguous"}))
}

pub fn shift(reason: &str) -> CompletionResponse {
    text(json!({"type": "intent_shift_detected", "current_intent": "faq", "reason": reason}))
}

pub fn call(name: &str, args: Value) -> RequestedCall {
    let map = match args {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    RequestedCall::new(name, map)
}
