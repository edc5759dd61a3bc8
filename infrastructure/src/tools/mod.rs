//! Tool adapters for the chat loop
//!
//! - [`ProcessToolExecutor`]: runs each invocation in an `atlas-executor` process
//! - [`JsonSchemaToolConverter`]: renders the catalog as function-calling tools

mod executor;
pub mod schema;

pub use executor::{
    EXECUTOR_BINARY, ExecutorSettings, ProcessToolExecutor, resolve_executor_program,
};
pub use schema::JsonSchemaToolConverter;
