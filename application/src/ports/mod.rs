//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_observer;
pub mod llm_gateway;
pub mod tool_executor;
pub mod tool_schema;
