//! OpenAI-compatible model adapter
//!
//! Implements LlmGateway over HTTP chat completions with function calling.

pub mod gateway;
pub mod protocol;

pub use gateway::{GatewaySettings, OpenAiGateway};
