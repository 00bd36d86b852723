use super::app::{AppConfig, ResourceUris, ToolGating};
use super::error::ConfigError;
use super::provider::{ProviderConfig, RawProviderConfig};
use super::server::{RawServer, ServerConfig};
use crate::constants::{CONFIG_PATH, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    model: Option<String>,
    intent_model: Option<String>,
    tool_gating: Option<String>,
    provider: Option<RawProviderConfig>,
    server: Option<RawServer>,
    #[serde(default)]
    resources: RawResources,
}

#[derive(Debug, Deserialize, Default)]
struct RawResources {
    persona: Option<String>,
    intents: Option<String>,
    record_schema: Option<String>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_PATH));
    read_config(config_path)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading client configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let model = non_blank(parsed.model).ok_or(ConfigError::MissingModel)?;
    let intent_model = non_blank(parsed.intent_model).unwrap_or_else(|| model.clone());

    let tool_gating = match parsed.tool_gating {
        Some(value) => value.parse::<ToolGating>()?,
        None => ToolGating::default(),
    };

    let raw_provider = parsed.provider.ok_or(ConfigError::MissingProvider)?;
    let endpoint = non_blank(raw_provider.endpoint).ok_or(ConfigError::MissingEndpoint)?;
    let provider = ProviderConfig {
        endpoint,
        api_key: raw_provider.api_key,
        api_path: non_blank(raw_provider.api_path),
    };

    let server = parsed
        .server
        .map(ServerConfig::from)
        .ok_or(ConfigError::MissingServer)?;

    let defaults = ResourceUris::default();
    let resources = ResourceUris {
        persona: non_blank(parsed.resources.persona).unwrap_or(defaults.persona),
        intents: non_blank(parsed.resources.intents).unwrap_or(defaults.intents),
        record_schema: non_blank(parsed.resources.record_schema)
            .unwrap_or(defaults.record_schema),
    };

    debug!(
        model = model.as_str(),
        intent_model = intent_model.as_str(),
        server = server.name.as_str(),
        ?tool_gating,
        "Configuration validated"
    );

    Ok(AppConfig {
        model,
        intent_model,
        tool_gating,
        provider,
        server,
        resources,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
model = "gemini-2.5-flash"

[provider]
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"

[server]
name = "qna"
command = "node"
args = ["dist/server.js"]
"#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = parse_config(MINIMAL, Path::new("client.toml")).expect("valid config");

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.intent_model, "gemini-2.5-flash");
        assert_eq!(config.tool_gating, ToolGating::Advisory);
        assert_eq!(config.provider.api_path, None);
        assert_eq!(config.resources, ResourceUris::default());
        assert_eq!(config.server.args, vec!["dist/server.js".to_string()]);
    }

    #[test]
    fn missing_sections_are_reported() {
        let no_model = MINIMAL.replace("model = \"gemini-2.5-flash\"", "");
        assert!(matches!(
            parse_config(&no_model, Path::new("c.toml")),
            Err(ConfigError::MissingModel)
        ));

        let no_server = MINIMAL
            .split("[server]")
            .next()
            .unwrap_or_default()
            .to_string();
        assert!(matches!(
            parse_config(&no_server, Path::new("c.toml")),
            Err(ConfigError::MissingServer)
        ));

        let blank_endpoint = MINIMAL.replace(
            "endpoint = \"https://generativelanguage.googleapis.com\"",
            "endpoint = \"  \"",
        );
        assert!(matches!(
            parse_config(&blank_endpoint, Path::new("c.toml")),
            Err(ConfigError::MissingEndpoint)
        ));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        assert!(matches!(
            parse_config("model = ", Path::new("c.toml")),
            Err(ConfigError::Parse { .. })
        ));
    }
}
