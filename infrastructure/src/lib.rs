//! Infrastructure layer for atlas
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the SQLite store and its operations, both
//! sides of the executor boundary, the model gateway, and configuration
//! file loading.

pub mod boundary;
pub mod config;
pub mod openai;
pub mod operations;
pub mod store;
pub mod tools;

// Re-export commonly used types
pub use boundary::{BoundaryExit, BoundaryServer, install_panic_logger};
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileExecutorConfig,
    FileModelConfig, FileStoreConfig, default_log_dir, store_env_vars,
};
pub use openai::{GatewaySettings, OpenAiGateway};
pub use operations::{OperationError, OperationRegistry};
pub use store::{Store, StoreConfig, StoreError, default_store_path};
pub use tools::{
    EXECUTOR_BINARY, ExecutorSettings, JsonSchemaToolConverter, ProcessToolExecutor,
    resolve_executor_program,
};
