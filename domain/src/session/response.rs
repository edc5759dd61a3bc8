//! Model reply types for the tool-calling chat API.
//!
//! A reply carries optional text plus zero or more [`RequestedCall`]s.
//! When calls are present the loop dispatches them; otherwise the text is
//! the answer.

use crate::invocation::entities::RequestedCall;
use serde::{Deserialize, Serialize};

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    Length,
    ContentFilter,
    Other(String),
}

impl FinishReason {
    /// Map the API's `finish_reason` string
    pub fn from_api(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "tool_calls" | "function_call" => FinishReason::ToolCalls,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

/// One reply from the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<RequestedCall>,
    pub finish_reason: FinishReason,
}

impl ModelReply {
    /// A plain text reply
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: FinishReason::Stop,
        }
    }

    /// A reply requesting tool calls
    pub fn with_tool_calls(calls: Vec<RequestedCall>) -> Self {
        Self {
            content: None,
            tool_calls: calls,
            finish_reason: FinishReason::ToolCalls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Text content, empty when absent
    pub fn text_content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}
