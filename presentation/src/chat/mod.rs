//! Interactive chat module
//!
//! Provides a readline-based interactive chat interface for ATLAS.

mod repl;

pub use repl::ChatRepl;
