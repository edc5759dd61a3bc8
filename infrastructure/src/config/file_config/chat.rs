//! Chat session configuration from TOML (`[chat]` section)

use atlas_application::DEFAULT_EXIT_PHRASES;
use serde::{Deserialize, Serialize};

/// Raw chat configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Phrases that end the session
    pub exit_phrases: Vec<String>,
    /// Replaces the built-in system prompt
    pub system_prompt: Option<String>,
    /// Path to REPL history file
    pub history_file: Option<String>,
    /// Show the spinner and tool progress lines
    pub show_progress: bool,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            exit_phrases: DEFAULT_EXIT_PHRASES.iter().map(|s| s.to_string()).collect(),
            system_prompt: None,
            history_file: None,
            show_progress: true,
        }
    }
}
