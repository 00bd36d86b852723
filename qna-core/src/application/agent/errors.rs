use crate::application::tooling::ToolInvokeError;
use crate::infrastructure::model::ModelError;
use thiserror::Error;

/// Structured model output that could not be accepted.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),
    #[error("response JSON has an unexpected shape: {0}")]
    Schema(#[source] serde_json::Error),
}

/// Persona or intent resources could not be loaded.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read resource '{uri}': {source}")]
    Resource {
        uri: String,
        #[source]
        source: ToolInvokeError,
    },
    #[error("resource '{uri}' has no text content")]
    EmptyResource { uri: String },
    #[error("resource '{uri}' is malformed: {source}")]
    Malformed {
        uri: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to list tools: {0}")]
    ListTools(#[source] ToolInvokeError),
}

impl SetupError {
    pub fn user_message(&self) -> String {
        match self {
            SetupError::Resource { source, .. } | SetupError::ListTools(source) => {
                source.user_message()
            }
            SetupError::EmptyResource { uri } | SetupError::Malformed { uri, .. } => {
                format!("The MCP server returned an unusable '{uri}' resource.")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("unknown intent '{name}'")]
    UnknownIntent { name: String },
    #[error("task executor has not been set up")]
    NotSetUp,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("invalid intent classifier response: {0}")]
    Response(#[from] ResponseError),
    #[error("intent classifier has not been set up")]
    NotSetUp,
}

/// Failures inside one executor turn. Never leaves the executor.
#[derive(Debug, Error)]
pub(crate) enum TaskError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("malformed function call: {0}")]
    MalformedCall(String),
    #[error("failed to execute '{tool}': {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolInvokeError,
    },
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Scope(#[from] ScopeError),
}

impl OrchestratorError {
    pub fn user_message(&self) -> String {
        match self {
            OrchestratorError::Classifier(ClassifierError::Model(err)) => err.user_message(),
            OrchestratorError::Classifier(_) => {
                "The assistant returned a response that could not be understood. Please try again."
                    .to_string()
            }
            OrchestratorError::Scope(ScopeError::UnknownIntent { name }) => {
                format!("The request was classified as '{name}', which is not a configured intent.")
            }
            OrchestratorError::Scope(ScopeError::NotSetUp) => {
                "The assistant is not ready yet.".to_string()
            }
        }
    }
}
