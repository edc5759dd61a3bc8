//! Configuration file loading for atlas
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `ATLAS_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./atlas.toml` or `./.atlas.toml`
//! 4. Global: `~/.config/atlas/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChatConfig, FileConfig, FileExecutorConfig, FileModelConfig,
    FileStoreConfig, default_log_dir, store_env_vars,
};
pub use loader::ConfigLoader;
