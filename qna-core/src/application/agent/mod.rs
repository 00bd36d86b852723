//! # Agent Module
//!
//! Two cooperating agents behind one [`Orchestrator`]:
//!
//! - [`IntentClassifier`] maps a query to one configured intent, asking
//!   clarifying questions while it is unsure.
//! - [`TaskExecutor`] answers inside that intent's scope, resolving function
//!   calls against the MCP server until the model returns a structured
//!   terminal reply (with up to three correction attempts).
//!
//! Executor progress is published through [`TaskObserver`].

mod errors;
mod events;
mod intent;
mod orchestrator;
mod prompts;
mod registry;
mod resources;
mod response;
mod task;

pub use errors::{ClassifierError, OrchestratorError, ResponseError, ScopeError, SetupError};
pub use events::{ObserverSet, TaskObserver};
pub use intent::IntentClassifier;
pub use orchestrator::Orchestrator;
pub use prompts::{
    AMBIGUOUS_INTENT_MESSAGE, GENERIC_FAILURE_MESSAGE, GET_PROMPT_PLACEHOLDER,
    MALFORMED_CALL_MESSAGE, RETRY_EXHAUSTED_MESSAGE, SCHEMA_UNAVAILABLE,
    UNRESOLVED_INTENT_MESSAGE, intent_classifier_prompt, task_executor_prompt,
};
pub use registry::{ToolKind, ToolRegistry, sanitize_schema};
pub use response::{
    IntentAgentResponse, TaskAgentResponse, parse_intent_response, parse_task_response,
};
pub use task::{MAX_JSON_ATTEMPTS, TaskExecutor};
