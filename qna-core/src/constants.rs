//! Application constants
//!
//! Single source of truth for paths, resource URIs and fixed tool names.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/client.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Resource holding the assistant persona JSON
pub const PERSONA_URI: &str = "config://persona";

/// Resource holding the intent catalogue JSON
pub const INTENTS_URI: &str = "config://intents";

/// Resource holding the schema used for structured record creation
pub const RECORD_SCHEMA_URI: &str = "schema://record";

/// Declared name of the knowledge document fetch capability
pub const DOCUMENT_FETCH_TOOL: &str = "get_knowledge_base_document";

/// Declared name of the record schema fetch capability
pub const SCHEMA_FETCH_TOOL: &str = "get_record_schema";

/// Reserved call name answered with a placeholder
pub const GET_PROMPT_TOOL: &str = "get_prompt";
