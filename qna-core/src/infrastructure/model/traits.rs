//! Model traits

use super::types::{CompletionRequest, CompletionResponse, ModelError};
use async_trait::async_trait;

/// A language-model backend that turns a conversation into the next model turn.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit the full history and receive either text or function calls.
    async fn submit(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError>;
}
