//! Executor process configuration from TOML (`[executor]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw executor configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Executor binary; `atlas-executor` next to `atlas` when unset
    pub program: Option<PathBuf>,
    /// Per-invocation wall-clock limit
    pub timeout_seconds: u64,
    /// Directory for `executor.log`
    pub log_dir: Option<PathBuf>,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            program: None,
            timeout_seconds: 10,
            log_dir: None,
        }
    }
}
