use super::errors::{ScopeError, SetupError, TaskError};
use super::events::{ObserverSet, TaskObserver};
use super::prompts::{
    GENERIC_FAILURE_MESSAGE, GET_PROMPT_PLACEHOLDER, MALFORMED_CALL_MESSAGE,
    RETRY_EXHAUSTED_MESSAGE, SCHEMA_UNAVAILABLE, corrective_instruction, task_executor_prompt,
    tool_refusal, transition_marker,
};
use super::registry::{ToolKind, ToolRegistry};
use super::resources::fetch_json;
use super::response::{TaskAgentResponse, parse_task_response};
use crate::application::tooling::ProtocolClient;
use crate::config::{ResourceUris, ToolGating};
use crate::constants::GET_PROMPT_TOOL;
use crate::domain::{ConversationHistory, ConversationTurn, Intent, Persona};
use crate::infrastructure::model::{
    CompletionProvider, CompletionRequest, FunctionDeclaration, RequestedCall, ResponseFormat,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Maximum attempts at a schema-valid terminal reply
pub const MAX_JSON_ATTEMPTS: u8 = 3;

/// Second stage: answers a query inside one intent's scope, calling tools
/// until the model produces a structured terminal reply.
pub struct TaskExecutor<P: CompletionProvider> {
    provider: Arc<P>,
    protocol: Arc<dyn ProtocolClient>,
    resources: ResourceUris,
    gating: ToolGating,
    persona: Option<Persona>,
    intents: Vec<Intent>,
    registry: ToolRegistry,
    scope: Option<Intent>,
    system_prompt: Option<String>,
    history: ConversationHistory,
    observers: ObserverSet,
}

impl<P: CompletionProvider> TaskExecutor<P> {
    pub fn new(provider: Arc<P>, protocol: Arc<dyn ProtocolClient>) -> Self {
        Self {
            provider,
            protocol,
            resources: ResourceUris::default(),
            gating: ToolGating::default(),
            persona: None,
            intents: Vec::new(),
            registry: ToolRegistry::default(),
            scope: None,
            system_prompt: None,
            history: ConversationHistory::new(),
            observers: ObserverSet::default(),
        }
    }

    pub fn with_resources(mut self, resources: ResourceUris) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_tool_gating(mut self, gating: ToolGating) -> Self {
        self.gating = gating;
        self
    }

    pub async fn setup(&mut self) -> Result<(), SetupError> {
        let protocol = self.protocol.as_ref();
        let intents: Vec<Intent> = fetch_json(protocol, &self.resources.intents).await?;
        let persona: Persona = fetch_json(protocol, &self.resources.persona).await?;
        let listed = protocol.list_tools().await.map_err(SetupError::ListTools)?;

        self.registry = ToolRegistry::new(listed);
        info!(
            persona = persona.name.as_str(),
            intents = intents.len(),
            tools = self.registry.len(),
            gating = ?self.gating,
            "Task executor ready"
        );
        self.intents = intents;
        self.persona = Some(persona);
        Ok(())
    }

    pub fn subscribe(&self, observer: Arc<dyn TaskObserver>) {
        self.observers.subscribe(observer);
    }

    /// Scope the executor to `intent_name`. Fails without touching the
    /// current scope when the intent is unknown.
    pub fn set_system_prompt(&mut self, intent_name: &str) -> Result<(), ScopeError> {
        let name = intent_name.trim();
        let persona = self.persona.as_ref().ok_or(ScopeError::NotSetUp)?;
        let intent = self
            .intents
            .iter()
            .find(|intent| intent.name == name)
            .cloned()
            .ok_or_else(|| ScopeError::UnknownIntent {
                name: name.to_string(),
            })?;

        let prompt = task_executor_prompt(&persona.system_prompt, &intent);

        if let Some(previous) = self.scope.as_ref().filter(|prev| prev.name != intent.name) {
            info!(from = previous.name.as_str(), to = name, "Task scope changed");
            self.history
                .push(ConversationTurn::user(transition_marker(&previous.name, name)));
        }
        debug!(intent = name, "Task system prompt set");
        self.system_prompt = Some(prompt);
        self.scope = Some(intent);
        Ok(())
    }

    /// Run one user query to a terminal reply. Failures come back as
    /// [`TaskAgentResponse::Error`].
    pub async fn process(&mut self, query: &str) -> TaskAgentResponse {
        match self.run(query).await {
            Ok(response) => response,
            Err(TaskError::MalformedCall(reason)) => {
                warn!(%reason, "Aborting task turn on malformed function call");
                TaskAgentResponse::error(MALFORMED_CALL_MESSAGE)
            }
            Err(err) => {
                error!(error = %err, "Task turn failed");
                TaskAgentResponse::error(GENERIC_FAILURE_MESSAGE)
            }
        }
    }

    async fn run(&mut self, query: &str) -> Result<TaskAgentResponse, TaskError> {
        self.history.push(ConversationTurn::user(query));

        for attempt in 1..=MAX_JSON_ATTEMPTS {
            loop {
                let response = self.provider.submit(self.build_request()).await?;

                if !response.has_function_calls() {
                    let text = response.text.unwrap_or_default();
                    match parse_task_response(&text) {
                        Ok(parsed) => {
                            self.history.push(ConversationTurn::model(text));
                            return Ok(parsed);
                        }
                        Err(err) => {
                            warn!(
                                attempt,
                                max_attempts = MAX_JSON_ATTEMPTS,
                                error = %err,
                                "Terminal reply failed validation, requesting correction"
                            );
                            // no correction after the last attempt; it would outlive the turn
                            if attempt < MAX_JSON_ATTEMPTS {
                                self.history.push(ConversationTurn::user(
                                    corrective_instruction(&err.to_string()),
                                ));
                            }
                            break;
                        }
                    }
                }

                debug!(calls = response.function_calls.len(), "Resolving function calls");
                for call in response.function_calls {
                    self.resolve_call(call).await?;
                }
            }
        }

        warn!(
            attempts = MAX_JSON_ATTEMPTS,
            "No valid terminal reply after max attempts"
        );
        Ok(TaskAgentResponse::error(RETRY_EXHAUSTED_MESSAGE))
    }

    fn build_request(&self) -> CompletionRequest {
        CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            history: self.history.snapshot(),
            tools: self.declared_tools(),
            response_format: ResponseFormat::Text,
            max_output_tokens: self
                .persona
                .as_ref()
                .and_then(|p| p.max_response_tokens)
                .map(|limit| limit.get()),
        }
    }

    fn declared_tools(&self) -> Vec<FunctionDeclaration> {
        match (self.gating, &self.scope) {
            (ToolGating::Strict, Some(intent)) => self.registry.declarations_allowed_by(intent),
            _ => self.registry.declarations(),
        }
    }

    async fn resolve_call(&mut self, call: RequestedCall) -> Result<(), TaskError> {
        let name = call
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| TaskError::MalformedCall("function call has no name".into()))?;
        let args = call
            .args
            .ok_or_else(|| TaskError::MalformedCall(format!("call to '{name}' has no arguments")))?;
        let id = call.id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let result = self.dispatch(&name, &args).await?;

        self.history
            .push(ConversationTurn::function_call(id.as_str(), name.as_str(), args));
        self.history
            .push(ConversationTurn::function_response(id, name, result));
        Ok(())
    }

    async fn dispatch(&self, name: &str, args: &Map<String, Value>) -> Result<String, TaskError> {
        if name == GET_PROMPT_TOOL {
            return Ok(GET_PROMPT_PLACEHOLDER.to_string());
        }

        match self.registry.kind_of(name) {
            ToolKind::ResourceFetch => {
                let uri = args.get("uri").and_then(Value::as_str).ok_or_else(|| {
                    TaskError::MalformedCall(format!("call to '{name}' has no 'uri' argument"))
                })?;
                self.fetch_document(name, uri).await
            }
            ToolKind::SchemaFetch => self.fetch_schema(name).await,
            ToolKind::Generic => self.call_generic(name, args).await,
        }
    }

    async fn fetch_document(&self, tool: &str, uri: &str) -> Result<String, TaskError> {
        self.observers.on_fetching_document(uri);
        info!(uri, "Fetching knowledge base document");
        let result = self
            .protocol
            .read_resource(uri)
            .await
            .map_err(|source| TaskError::Tool {
                tool: tool.to_string(),
                source,
            })?;

        Ok(result
            .contents
            .iter()
            .filter_map(|part| {
                let text = part.text.as_deref()?;
                let part_uri = part.uri.as_deref().unwrap_or(uri);
                Some(format!("{part_uri}\n{text}"))
            })
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    async fn fetch_schema(&self, tool: &str) -> Result<String, TaskError> {
        let uri = self.resources.record_schema.as_str();
        debug!(uri, "Fetching record schema");
        let result = self
            .protocol
            .read_resource(uri)
            .await
            .map_err(|source| TaskError::Tool {
                tool: tool.to_string(),
                source,
            })?;
        Ok(result
            .first_text()
            .unwrap_or(SCHEMA_UNAVAILABLE)
            .to_string())
    }

    async fn call_generic(&self, name: &str, args: &Map<String, Value>) -> Result<String, TaskError> {
        if self.gating == ToolGating::Strict {
            if let Some(intent) = self.scope.as_ref().filter(|intent| !intent.allows(name)) {
                warn!(tool = name, intent = intent.name.as_str(), "Refusing tool outside intent scope");
                return Ok(tool_refusal(name, &intent.name));
            }
        }

        let arguments = Value::Object(args.clone());
        self.observers.on_calling_tool(name, &arguments.to_string());
        info!(tool = name, "Calling MCP tool");
        let result = self
            .protocol
            .call_tool(name, arguments)
            .await
            .map_err(|source| TaskError::Tool {
                tool: name.to_string(),
                source,
            })?;

        Ok(match result.first_text() {
            Some(text) => text.to_string(),
            None => result
                .structured_content
                .unwrap_or(Value::Null)
                .to_string(),
        })
    }

    pub fn active_intent(&self) -> Option<&str> {
        self.scope.as_ref().map(|intent| intent.name.as_str())
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn persona(&self) -> Option<&Persona> {
        self.persona.as_ref()
    }

    /// Drop history and scope; persona, intents and tools stay loaded.
    pub fn reset(&mut self) {
        self.history.clear();
        self.scope = None;
        self.system_prompt = None;
    }
}
