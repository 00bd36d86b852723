use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required field 'model' in configuration")]
    MissingModel,

    #[error("missing required [provider] section in configuration")]
    MissingProvider,

    #[error("provider is missing required field 'endpoint'")]
    MissingEndpoint,

    #[error("missing required [server] section in configuration")]
    MissingServer,

    #[error("invalid tool_gating '{value}', expected 'advisory' or 'strict'")]
    InvalidToolGating { value: String },
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NotFound { path } => {
                format!("No configuration found at {}. Pass --config <path>.", path.display())
            }
            ConfigError::Io { path, .. } => format!("Could not read {}.", path.display()),
            ConfigError::Parse { path, source } => {
                format!("{} is not valid TOML: {}", path.display(), source.message())
            }
            other => other.to_string(),
        }
    }
}
