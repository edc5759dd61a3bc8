//! Invocation entities: what the model asked for and what came back

use super::value_objects::{InvocationError, InvocationOutcome};
use crate::operation::entities::number_as_i64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Correlation id linking a model request to its `tool` turn
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CallId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CallId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A tool call exactly as the model returned it.
///
/// `raw_arguments` is kept as text so malformed payloads can be reported
/// back to the model instead of failing the whole reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedCall {
    pub call_id: CallId,
    pub operation_name: String,
    pub raw_arguments: String,
}

impl RequestedCall {
    pub fn new(
        call_id: impl Into<CallId>,
        operation_name: impl Into<String>,
        raw_arguments: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            operation_name: operation_name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }

    /// Decode the argument text into a [`ToolInvocation`].
    ///
    /// Blank text means "no arguments". Anything that is not a JSON object
    /// is an `invalid_arguments` error for this call only.
    pub fn parse(&self) -> Result<ToolInvocation, InvocationError> {
        let raw = self.raw_arguments.trim();
        let arguments = if raw.is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                Ok(Value::Null) => Map::new(),
                Ok(other) => {
                    return Err(InvocationError::invalid_arguments(format!(
                        "Arguments for '{}' must be a JSON object",
                        self.operation_name
                    ))
                    .with_details(other.to_string()));
                }
                Err(e) => {
                    return Err(InvocationError::invalid_arguments(format!(
                        "Could not decode JSON arguments for '{}': {}",
                        self.operation_name, e
                    ))
                    .with_details(self.raw_arguments.clone()));
                }
            }
        };

        Ok(ToolInvocation {
            call_id: self.call_id.clone(),
            operation_name: self.operation_name.clone(),
            arguments,
        })
    }
}

/// A decoded invocation ready for dispatch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call_id: CallId,
    pub operation_name: String,
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(call_id: impl Into<CallId>, operation_name: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            operation_name: operation_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// String argument; `null` and blank strings count as absent
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.arguments
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Integer argument, accepting numeric strings
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.arguments.get(key)? {
            Value::Number(n) => number_as_i64(n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn require_str(&self, key: &str) -> Result<&str, InvocationError> {
        self.get_str(key).ok_or_else(|| {
            InvocationError::invalid_arguments(format!(
                "Missing required string parameter '{}'",
                key
            ))
        })
    }

    pub fn require_i64(&self, key: &str) -> Result<i64, InvocationError> {
        self.get_i64(key).ok_or_else(|| {
            InvocationError::invalid_arguments(format!(
                "Missing required integer parameter '{}'",
                key
            ))
        })
    }
}

/// Outcome of one invocation, keyed by its call id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub call_id: CallId,
    pub operation_name: String,
    pub outcome: InvocationOutcome,
}

impl InvocationResult {
    pub fn new(call: &RequestedCall, outcome: InvocationOutcome) -> Self {
        Self {
            call_id: call.call_id.clone(),
            operation_name: call.operation_name.clone(),
            outcome,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
