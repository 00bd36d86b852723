use crate::application::tooling::RemoteTool;
use crate::constants::{DOCUMENT_FETCH_TOOL, SCHEMA_FETCH_TOOL};
use crate::domain::Intent;
use crate::infrastructure::model::FunctionDeclaration;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::warn;

/// How a declared capability is resolved when the model calls it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Forwarded to the MCP server as `tools/call`.
    Generic,
    /// Reads a knowledge document by URI.
    ResourceFetch,
    /// Reads the fixed record-schema resource.
    SchemaFetch,
}

#[derive(Debug, Clone)]
struct RegisteredTool {
    kind: ToolKind,
    declaration: FunctionDeclaration,
}

/// Capabilities declared to the completion provider, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Registers every listed tool followed by the two built-in fetches.
    pub fn new(remote: Vec<RemoteTool>) -> Self {
        let mut registry = Self::default();
        for tool in remote {
            if is_builtin(&tool.name) {
                warn!(tool = tool.name.as_str(), "server tool shadows a built-in, skipping");
                continue;
            }
            registry.insert(
                ToolKind::Generic,
                FunctionDeclaration {
                    name: tool.name,
                    description: tool.description,
                    parameters: tool.input_schema.map(sanitize_schema),
                },
            );
        }
        registry.insert(ToolKind::ResourceFetch, document_fetch_declaration());
        registry.insert(ToolKind::SchemaFetch, schema_fetch_declaration());
        registry
    }

    fn insert(&mut self, kind: ToolKind, declaration: FunctionDeclaration) {
        let name = declaration.name.clone();
        match self.index.get(&name) {
            Some(&slot) => self.tools[slot] = RegisteredTool { kind, declaration },
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(RegisteredTool { kind, declaration });
            }
        }
    }

    /// Names that were never registered resolve as generic tools.
    pub fn kind_of(&self, name: &str) -> ToolKind {
        self.index
            .get(name)
            .map(|&slot| self.tools[slot].kind)
            .unwrap_or(ToolKind::Generic)
    }

    pub fn declarations(&self) -> Vec<FunctionDeclaration> {
        self.tools.iter().map(|t| t.declaration.clone()).collect()
    }

    /// Generic tools restricted to `intent.allowed_tools`; built-ins always kept.
    pub fn declarations_allowed_by(&self, intent: &Intent) -> Vec<FunctionDeclaration> {
        self.tools
            .iter()
            .filter(|t| t.kind != ToolKind::Generic || intent.allows(&t.declaration.name))
            .map(|t| t.declaration.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn is_builtin(name: &str) -> bool {
    name == DOCUMENT_FETCH_TOOL || name == SCHEMA_FETCH_TOOL
}

/// Drops top-level keys the provider's schema dialect rejects.
pub fn sanitize_schema(schema: Value) -> Value {
    match schema {
        Value::Object(mut map) => {
            map.remove("additionalProperties");
            map.remove("$schema");
            Value::Object(map)
        }
        other => other,
    }
}

fn document_fetch_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        name: DOCUMENT_FETCH_TOOL.to_string(),
        description: Some(
            "Fetch the full content of a knowledge base document by its URI.".to_string(),
        ),
        parameters: Some(json!({
            "type": "object",
            "properties": {
                "uri": {
                    "type": "string",
                    "description": "URI of the document, as returned by the search tool"
                }
            },
            "required": ["uri"]
        })),
    }
}

fn schema_fetch_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        name: SCHEMA_FETCH_TOOL.to_string(),
        description: Some(
            "Fetch the JSON schema that structured records must follow.".to_string(),
        ),
        parameters: Some(json!({
            "type": "object",
            "properties": {}
        })),
    }
}
