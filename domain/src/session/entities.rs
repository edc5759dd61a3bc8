//! Session domain entities

use crate::core::error::DomainError;
use crate::invocation::entities::{CallId, InvocationResult, RequestedCall};
use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One role-tagged entry in the conversation history (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// Calls requested by an assistant turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<RequestedCall>,
    /// Correlation id of a tool turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<CallId>,
    /// Operation name of a tool turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Turn {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    pub fn assistant_with_calls(content: impl Into<String>, calls: Vec<RequestedCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::plain(Role::Assistant, content)
        }
    }

    pub fn tool(result: &InvocationResult) -> Self {
        Self {
            tool_call_id: Some(result.call_id.clone()),
            name: Some(result.operation_name.clone()),
            ..Self::plain(Role::Tool, result.outcome.render())
        }
    }

    pub fn requests(&self, call_id: &CallId) -> bool {
        self.tool_calls.iter().any(|c| &c.call_id == call_id)
    }
}

/// Ordered, append-only history of one interactive session.
///
/// The first turn is always the system prompt. A `tool` turn is accepted
/// only when the nearest preceding non-tool turn is the assistant turn that
/// requested its call id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::assistant(content));
    }

    pub fn push_assistant_calls(&mut self, content: impl Into<String>, calls: Vec<RequestedCall>) {
        self.turns.push(Turn::assistant_with_calls(content, calls));
    }

    /// Append a tool turn, enforcing the correlation invariant
    pub fn push_tool_result(&mut self, result: &InvocationResult) -> Result<(), DomainError> {
        let mut requester = None;
        for turn in self.turns.iter().rev() {
            if turn.role != Role::Tool {
                requester = Some(turn);
                break;
            }
            if turn.tool_call_id.as_ref() == Some(&result.call_id) {
                return Err(DomainError::DuplicateToolResult(
                    result.call_id.to_string(),
                ));
            }
        }

        match requester {
            Some(turn) if turn.role == Role::Assistant && turn.requests(&result.call_id) => {
                self.turns.push(Turn::tool(result));
                Ok(())
            }
            _ => Err(DomainError::UnrequestedToolResult(
                result.call_id.to_string(),
            )),
        }
    }

    /// Remove the trailing user turn, if the last turn is one
    pub fn rollback_user_turn(&mut self) -> Option<Turn> {
        if self.turns.last().is_some_and(|t| t.role == Role::User) {
            self.turns.pop()
        } else {
            None
        }
    }
}
