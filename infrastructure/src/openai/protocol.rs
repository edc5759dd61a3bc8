//! Chat-completions wire types.
//!
//! Only the fields the tool-call loop needs are modelled. Tool call
//! `arguments` stay raw strings in both directions so malformed ones reach
//! the loop untouched.

use atlas_domain::{FinishReason, ModelReply, RequestedCall, Role, Turn};
use serde::{Deserialize, Serialize};

/// `POST /chat/completions` body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tools: &'a [serde_json::Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// `null` for assistant turns that only carry tool calls
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: WireFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// `{"error": {"message": ...}}` body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiError {
    /// `message`, or `message (code)` when the provider sent a code
    pub fn describe(&self) -> String {
        match &self.code {
            Some(serde_json::Value::String(code)) => format!("{} ({})", self.message, code),
            Some(serde_json::Value::Number(code)) => format!("{} ({})", self.message, code),
            _ => self.message.clone(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        let tool_calls = (!turn.tool_calls.is_empty()).then(|| {
            turn.tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.call_id.to_string(),
                    call_type: function_type(),
                    function: WireFunctionCall {
                        name: call.operation_name.clone(),
                        arguments: call.raw_arguments.clone(),
                    },
                })
                .collect()
        });

        let content = match turn.role {
            Role::Assistant if tool_calls.is_some() && turn.content.is_empty() => None,
            _ => Some(turn.content.clone()),
        };

        Self {
            role: turn.role.as_str().to_string(),
            content,
            tool_calls,
            tool_call_id: turn.tool_call_id.as_ref().map(|id| id.to_string()),
            name: turn.name.clone(),
        }
    }
}

impl ChatChoice {
    pub fn into_reply(self) -> ModelReply {
        let tool_calls = self
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| RequestedCall::new(tc.id, tc.function.name, tc.function.arguments))
            .collect();

        ModelReply {
            content: self.message.content.filter(|c| !c.is_empty()),
            tool_calls,
            finish_reason: self
                .finish_reason
                .as_deref()
                .map(FinishReason::from_api)
                .unwrap_or(FinishReason::Stop),
        }
    }
}
