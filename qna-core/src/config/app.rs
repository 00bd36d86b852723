use super::error::ConfigError;
use super::provider::ProviderConfig;
use super::server::ServerConfig;
use crate::constants::{INTENTS_URI, PERSONA_URI, RECORD_SCHEMA_URI};
use std::path::Path;
use std::str::FromStr;

/// How an intent's `allowed_tools` list is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolGating {
    /// The list only appears in the system prompt.
    #[default]
    Advisory,
    /// Undeclared generic tools are hidden and refused.
    Strict,
}

impl FromStr for ToolGating {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "strict" => Ok(Self::Strict),
            _ => Err(ConfigError::InvalidToolGating {
                value: value.to_string(),
            }),
        }
    }
}

/// Resource URIs read from the MCP server during setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUris {
    pub persona: String,
    pub intents: String,
    pub record_schema: String,
}

impl Default for ResourceUris {
    fn default() -> Self {
        Self {
            persona: PERSONA_URI.to_string(),
            intents: INTENTS_URI.to_string(),
            record_schema: RECORD_SCHEMA_URI.to_string(),
        }
    }
}

/// Application configuration loaded from client.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    pub intent_model: String,
    pub tool_gating: ToolGating,
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub resources: ResourceUris,
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_gating_parses_case_insensitively() {
        assert_eq!("Strict".parse::<ToolGating>().ok(), Some(ToolGating::Strict));
        assert_eq!(" advisory ".parse::<ToolGating>().ok(), Some(ToolGating::Advisory));
        assert!(matches!(
            "loose".parse::<ToolGating>(),
            Err(ConfigError::InvalidToolGating { .. })
        ));
    }
}
