//! LLM Gateway port
//!
//! Defines the interface for communicating with the generative backend.

use async_trait::async_trait;
use colloquy_domain::{ChatMessage, Model};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One call to the backend: a persona's instructions plus the transcript as
/// that persona sees it.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: Model,
    /// System prompt of the speaking persona
    pub instructions: String,
    /// Seed message followed by every valid turn so far
    pub history: Vec<ChatMessage>,
    /// Read-only context the instructions were rendered from
    pub variables: BTreeMap<String, String>,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Produce the next utterance for `request`.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}
