//! Application-level configuration.
//!
//! - [`SessionConfig`]: system prompt and exit phrases for the tool-call loop

pub mod session_config;

pub use session_config::{DEFAULT_EXIT_PHRASES, DEFAULT_SYSTEM_PROMPT, SessionConfig};
