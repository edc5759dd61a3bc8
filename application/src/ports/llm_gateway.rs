//! LLM Gateway port
//!
//! Defines the interface for querying a tool-calling chat model.

use async_trait::async_trait;
use atlas_domain::{ModelReply, Turn};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model returned no choices")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Whether the model may request tool calls on this query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoice {
    /// The model decides between tool calls and text
    Auto,
    /// Text only; the catalog is still sent for context
    None,
}

impl ToolChoice {
    pub fn as_str(&self) -> &str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::None => "none",
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the model.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the full history plus the tool catalog and return one reply
    async fn complete(
        &self,
        turns: &[Turn],
        tools: &[serde_json::Value],
        tool_choice: ToolChoice,
    ) -> Result<ModelReply, GatewayError>;

    /// Model identifier, for display and logs
    fn model_name(&self) -> &str;
}
