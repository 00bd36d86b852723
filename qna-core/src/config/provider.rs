//! Completion provider settings (`[provider]` table).

use serde::Deserialize;

/// Connection settings for the Gemini-compatible completion endpoint.
///
/// ```toml
/// [provider]
/// endpoint = "https://generativelanguage.googleapis.com"
/// api_key = "GEMINI_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API endpoint URL
    pub endpoint: String,
    /// Name of the environment variable holding the key
    pub api_key: Option<String>,
    /// Custom API path override, `v1beta/models` when absent
    pub api_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub(super) struct RawProviderConfig {
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
}
