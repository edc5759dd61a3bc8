//! Executor boundary wire format
//!
//! One request per process on stdin, one response envelope on stdout:
//!
//! ```text
//! stdin : {"function": "crear_tarea", "arguments": {"project_id": 1, "description": "x"}}
//! stdout: {"status":"success","output":"Tarea 'x' creada ..."}
//!       | {"status":"failure","kind":"not_found","message":"...","details":"..."}
//! ```
//!
//! The process exit status mirrors the envelope (see [`BoundaryStatus`]).

use super::entities::ToolInvocation;
use super::value_objects::{ErrorKind, InvocationError, InvocationOutcome};
use serde::Serialize;
use serde_json::{Map, Value};

/// Request read by the executor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryRequest {
    pub function: String,
    pub arguments: Map<String, Value>,
}

impl BoundaryRequest {
    pub fn new(function: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            function: function.into(),
            arguments,
        }
    }

    pub fn from_invocation(invocation: &ToolInvocation) -> Self {
        Self::new(invocation.operation_name.clone(), invocation.arguments.clone())
    }

    pub fn encode(&self) -> Result<String, InvocationError> {
        serde_json::to_string(self).map_err(|e| {
            InvocationError::protocol(format!("Could not encode boundary request: {}", e))
        })
    }
}

/// Decode a request, distinguishing malformed JSON from a missing `function`.
pub fn decode_request(input: &str) -> Result<BoundaryRequest, InvocationError> {
    let value: Value = serde_json::from_str(input).map_err(|e| {
        InvocationError::protocol(format!("Could not decode request JSON: {}", e))
            .with_details(preview(input))
    })?;

    let Value::Object(mut object) = value else {
        return Err(InvocationError::protocol("Request must be a JSON object")
            .with_details(preview(input)));
    };

    let function = match object.remove("function") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => {
            return Err(
                InvocationError::protocol("Invalid request: missing 'function'")
                    .with_details(preview(input)),
            );
        }
    };

    let arguments = match object.remove("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(
                InvocationError::protocol("Invalid request: 'arguments' must be an object")
                    .with_details(other.to_string()),
            );
        }
    };

    Ok(BoundaryRequest {
        function,
        arguments,
    })
}

/// Encode the response envelope as a single line
pub fn encode_response(outcome: &InvocationOutcome) -> String {
    match serde_json::to_string(outcome) {
        Ok(line) => line,
        // Only reachable if serde_json itself misbehaves; keep the envelope shape.
        Err(e) => format!(
            r#"{{"status":"failure","kind":"crashed","message":"response encoding failed: {}"}}"#,
            e.to_string().replace('"', "'")
        ),
    }
}

/// Decode the envelope written by the executor
pub fn decode_response(stdout: &str) -> Result<InvocationOutcome, InvocationError> {
    serde_json::from_str(stdout.trim()).map_err(|e| {
        InvocationError::protocol(format!("Executor returned an unreadable response: {}", e))
            .with_details(preview(stdout))
    })
}

/// Exit status of the executor process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryStatus {
    /// Operation succeeded
    Success,
    /// Operation-level failure; an error envelope was written
    OperationFailed,
    /// Request could not be decoded
    ProtocolError,
    /// Unexpected failure inside the executor
    Internal,
}

impl BoundaryStatus {
    pub fn code(&self) -> i32 {
        match self {
            BoundaryStatus::Success => 0,
            BoundaryStatus::OperationFailed => 1,
            BoundaryStatus::ProtocolError => 2,
            BoundaryStatus::Internal => 3,
        }
    }

    pub fn for_outcome(outcome: &InvocationOutcome) -> Self {
        match outcome.error().map(|e| e.kind) {
            None => BoundaryStatus::Success,
            Some(ErrorKind::Protocol) => BoundaryStatus::ProtocolError,
            Some(ErrorKind::Crashed) => BoundaryStatus::Internal,
            Some(_) => BoundaryStatus::OperationFailed,
        }
    }
}

fn preview(input: &str) -> String {
    const LIMIT: usize = 100;
    let mut chars = input.chars();
    let head: String = chars.by_ref().take(LIMIT).collect();
    if chars.next().is_some() {
        format!("Input: {}...", head)
    } else {
        format!("Input: {}", head)
    }
}
