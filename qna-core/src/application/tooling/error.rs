use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolInvokeError {
    #[error("failed to spawn MCP server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },
    #[error("MCP server '{server}' transport error: {message}")]
    Transport { server: String, message: String },
    #[error("MCP server '{server}' returned invalid JSON: {source}")]
    InvalidJson {
        server: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },
    #[error("MCP server '{server}' terminated unexpectedly")]
    Terminated { server: String },
    #[error("MCP server '{server}' request cancelled")]
    Cancelled { server: String },
}

impl ToolInvokeError {
    pub fn user_message(&self) -> String {
        match self {
            ToolInvokeError::Spawn { server, .. } => {
                format!("Could not start MCP server '{server}'. Check the [server] command.")
            }
            ToolInvokeError::Terminated { server } | ToolInvokeError::Cancelled { server } => {
                format!("MCP server '{server}' stopped responding.")
            }
            ToolInvokeError::Rpc { server, message, .. } => {
                format!("MCP server '{server}' rejected the request: {message}")
            }
            ToolInvokeError::Transport { server, .. }
            | ToolInvokeError::InvalidJson { server, .. } => {
                format!("Communication with MCP server '{server}' failed.")
            }
        }
    }
}
