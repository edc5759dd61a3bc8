//! Model endpoint configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://models.github.ai/inference";
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-nano";
pub const DEFAULT_API_KEY_ENV: &str = "GIT_TOKEN";

/// Raw model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// endpoint = "https://models.github.ai/inference"
/// name = "openai/gpt-4.1-nano"
/// api_key_env = "GIT_TOKEN"
/// request_timeout_seconds = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// OpenAI-compatible base URL
    pub endpoint: String,
    pub name: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub request_timeout_seconds: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            name: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_seconds: 60,
        }
    }
}
