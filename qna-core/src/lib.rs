//! # qna-core
//!
//! Two-stage conversational routing on top of a completion provider and an
//! MCP tool/resource server.
//!
//! A query first reaches the [`IntentClassifier`](agent::IntentClassifier),
//! which either asks a clarifying question or names one of the configured
//! intents. The [`Orchestrator`](agent::Orchestrator) then scopes the
//! [`TaskExecutor`](agent::TaskExecutor) to that intent, and the executor runs
//! a tool-calling loop until the model produces a structured terminal answer.
//!
//! ## Modules
//!
//! - [`config`] - `client.toml` loading and validation
//! - [`domain`] - persona, intents and conversation turns
//! - [`application`] - the agents and the MCP protocol client
//! - [`infrastructure`] - completion provider abstraction and the Gemini client

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{agent, tooling};
pub use config::{AppConfig, ConfigError};
pub use domain::types;
pub use infrastructure::model;
