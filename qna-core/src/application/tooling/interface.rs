use super::error::ToolInvokeError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// A tool advertised by the server's `tools/list`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default)]
    pub structured_content: Option<Value>,
    #[serde(default)]
    pub is_error: bool,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
            ..Self::default()
        }
    }

    /// First textual content item, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .filter(|item| item.kind == "text")
            .find_map(|item| item.text.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReadResourceResult {
    #[serde(default)]
    pub contents: Vec<ResourceContents>,
}

impl ReadResourceResult {
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContents {
                uri: Some(uri.into()),
                mime_type: None,
                text: Some(text.into()),
            }],
        }
    }

    /// Text of the first content block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.contents.first().and_then(|c| c.text.as_deref())
    }
}

/// Client side of the MCP tool/resource protocol.
#[async_trait]
pub trait ProtocolClient: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<RemoteTool>, ToolInvokeError>;

    async fn call_tool(&self, name: &str, arguments: Value)
    -> Result<CallToolResult, ToolInvokeError>;

    async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ToolInvokeError>;
}
