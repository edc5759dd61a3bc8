//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! After [`FileConfig::validate`] they are converted once into the
//! explicit settings each adapter takes.

mod chat;
mod executor;
mod model;
mod store;

pub use chat::FileChatConfig;
pub use executor::FileExecutorConfig;
pub use model::FileModelConfig;
pub use store::FileStoreConfig;

use crate::openai::GatewaySettings;
use crate::store::{StoreConfig, default_store_path};
use crate::tools::{ExecutorSettings, resolve_executor_program};
use atlas_application::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("chat.exit_phrases must contain at least one phrase")]
    NoExitPhrases,

    #[error(
        "store retries ({retry_ms} ms) do not fit within executor.timeout_seconds ({timeout_seconds} s)"
    )]
    RetryExceedsTimeout { retry_ms: u64, timeout_seconds: u64 },

    #[error("API key not found: set the {0} environment variable")]
    MissingApiKey(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub model: FileModelConfig,
    pub executor: FileExecutorConfig,
    pub store: FileStoreConfig,
    pub chat: FileChatConfig,
}

impl FileConfig {
    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.model.name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        if self.model.request_timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroValue("model.request_timeout_seconds"));
        }
        if self.executor.timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroValue("executor.timeout_seconds"));
        }
        if self.store.connect_attempts == 0 {
            return Err(ConfigValidationError::ZeroValue("store.connect_attempts"));
        }
        if self.store.page_size == 0 {
            return Err(ConfigValidationError::ZeroValue("store.page_size"));
        }
        let retry_ms = u64::from(self.store.connect_attempts - 1)
            .saturating_mul(self.store.retry_delay_ms);
        if retry_ms >= self.executor.timeout_seconds.saturating_mul(1000) {
            return Err(ConfigValidationError::RetryExceedsTimeout {
                retry_ms,
                timeout_seconds: self.executor.timeout_seconds,
            });
        }
        if self.chat.exit_phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigValidationError::NoExitPhrases);
        }
        Ok(())
    }

    // ==================== Conversions ====================

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            path: self
                .store
                .path
                .as_deref()
                .map(expand_tilde)
                .unwrap_or_else(default_store_path),
            connect_attempts: self.store.connect_attempts,
            retry_delay: Duration::from_millis(self.store.retry_delay_ms),
            page_size: self.store.page_size,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::default().with_exit_phrases(
            self.chat
                .exit_phrases
                .iter()
                .filter(|p| !p.trim().is_empty())
                .cloned(),
        );
        if let Some(prompt) = self.chat.system_prompt.as_deref().filter(|p| !p.trim().is_empty()) {
            config = config.with_system_prompt(prompt);
        }
        config
    }

    /// Settings for spawning executors that share this process's store.
    pub fn executor_settings(&self, store: &StoreConfig) -> ExecutorSettings {
        let program = resolve_executor_program(
            self.executor.program.as_deref().map(expand_tilde).as_deref(),
        );
        let mut settings = ExecutorSettings::new(program)
            .with_timeout(Duration::from_secs(self.executor.timeout_seconds));
        for (key, value) in store_env_vars(store) {
            settings = settings.with_env(key, value);
        }
        settings = settings.with_env(
            "ATLAS_EXECUTOR__LOG_DIR",
            self.log_dir().to_string_lossy().into_owned(),
        );
        settings
    }

    /// Gateway settings, reading the bearer token from the configured variable.
    pub fn gateway_settings(&self) -> Result<GatewaySettings, ConfigValidationError> {
        let api_key = std::env::var(&self.model.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigValidationError::MissingApiKey(self.model.api_key_env.clone()))?;

        Ok(GatewaySettings {
            endpoint: self.model.endpoint.clone(),
            model: self.model.name.clone(),
            api_key,
            request_timeout: Duration::from_secs(self.model.request_timeout_seconds),
        })
    }

    /// Directory for `executor.log`
    pub fn log_dir(&self) -> PathBuf {
        self.executor
            .log_dir
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(default_log_dir)
    }

    pub fn history_file(&self) -> Option<PathBuf> {
        self.chat.history_file.as_deref().map(|p| expand_tilde(Path::new(p)))
    }
}

/// `ATLAS_STORE__*` variables reproducing `store` in a child process
pub fn store_env_vars(store: &StoreConfig) -> Vec<(String, String)> {
    vec![
        (
            "ATLAS_STORE__PATH".to_string(),
            store.path.to_string_lossy().into_owned(),
        ),
        (
            "ATLAS_STORE__CONNECT_ATTEMPTS".to_string(),
            store.connect_attempts.to_string(),
        ),
        (
            "ATLAS_STORE__RETRY_DELAY_MS".to_string(),
            store.retry_delay.as_millis().to_string(),
        ),
        (
            "ATLAS_STORE__PAGE_SIZE".to_string(),
            store.page_size.to_string(),
        ),
    ]
}

/// `<data dir>/atlas/logs`
pub fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("atlas").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
