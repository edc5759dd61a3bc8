//! Store configuration from TOML (`[store]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// SQLite file; the platform data dir when unset
    pub path: Option<PathBuf>,
    pub connect_attempts: u32,
    pub retry_delay_ms: u64,
    /// Row cap for `listar_tareas`
    pub page_size: u32,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            connect_attempts: 5,
            retry_delay_ms: 1000,
            page_size: 10,
        }
    }
}
