mod error;
mod interface;
mod process;

pub use error::ToolInvokeError;
pub use interface::{
    CallToolResult, ContentItem, ProtocolClient, ReadResourceResult, RemoteTool,
    ResourceContents,
};
pub use process::McpProcess;
