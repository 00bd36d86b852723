//! Model infrastructure module
//!
//! Completion provider abstraction plus the HTTP clients that implement it.
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - CompletionProvider trait
//! - `adapter` - Conversation to wire-format adapters
//! - `clients` - Individual client implementations

pub mod adapter;
pub mod clients;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use clients::GeminiClient;
pub use traits::CompletionProvider;
pub use types::{
    CompletionRequest, CompletionResponse, FunctionDeclaration, ModelError, RequestedCall,
    ResponseFormat,
};
