use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Behavioural base prompt for the task agent, served by the MCP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub system_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_response_tokens: Option<NonZeroU32>,
}

/// A named task scope and the tools the model may use inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    pub description: String,
    pub allowed_tools: Vec<String>,
}

impl Intent {
    pub fn allows(&self, tool: &str) -> bool {
        self.allowed_tools.iter().any(|allowed| allowed == tool)
    }
}
