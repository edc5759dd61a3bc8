//! Application layer for atlas
//!
//! This crate contains the tool-call loop use case, its port definitions,
//! and session configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_EXIT_PHRASES, DEFAULT_SYSTEM_PROMPT, SessionConfig};
pub use ports::{
    chat_observer::{ChatObserver, NoObserver, QueryPhase},
    llm_gateway::{GatewayError, LlmGateway, ToolChoice},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::run_chat::{ChatSession, ChatState, TurnOutcome};
pub use use_cases::tool_helpers::{call_args_preview, truncate_preview};
