//! Invocation value objects: discriminated outcomes and typed errors
//!
//! Every invocation ends in exactly one [`InvocationOutcome`]. Failures
//! carry an [`ErrorKind`] so callers branch on the kind, never on text.

use serde::{Deserialize, Serialize};

/// Classification of an invocation failure.
///
/// | Kind | Raised by | Fatal? |
/// |------|-----------|--------|
/// | `invalid_arguments` | loop / validator | No |
/// | `not_found` | registry / store | No |
/// | `conflict` | store (unique constraint) | No |
/// | `store_unavailable` | store connection retries | No |
/// | `operation_failed` | store | No |
/// | `protocol` | boundary codec | No |
/// | `timeout` | executor deadline | No |
/// | `executor_unavailable` | executor spawn | Yes |
/// | `crashed` | boundary diagnostics / panic | Yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArguments,
    NotFound,
    Conflict,
    StoreUnavailable,
    OperationFailed,
    Protocol,
    Timeout,
    ExecutorUnavailable,
    Crashed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorKind::InvalidArguments => "invalid_arguments",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::StoreUnavailable => "store_unavailable",
            ErrorKind::OperationFailed => "operation_failed",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Timeout => "timeout",
            ErrorKind::ExecutorUnavailable => "executor_unavailable",
            ErrorKind::Crashed => "crashed",
        }
    }

    /// Failures of the executor itself rather than of one operation
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::ExecutorUnavailable | ErrorKind::Crashed)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error produced by one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationError {
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Additional details (offending input, driver error, diagnostics)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl InvocationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArguments, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unknown_operation(name: &str) -> Self {
        Self::not_found(format!("Operation '{}' not found", name))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OperationFailed, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("Executor did not answer within {}s", seconds),
        )
    }

    pub fn executor_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExecutorUnavailable, message)
    }

    pub fn crashed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Crashed, message)
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl std::fmt::Display for InvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvocationError {}

/// Result of one invocation.
///
/// Serialized form is the boundary response envelope:
///
/// ```
/// use atlas_domain::InvocationOutcome;
///
/// let ok = InvocationOutcome::success("created");
/// assert_eq!(
///     serde_json::to_string(&ok).unwrap(),
///     r#"{"status":"success","output":"created"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Success { output: String },
    Failure(InvocationError),
}

impl InvocationOutcome {
    pub fn success(output: impl Into<String>) -> Self {
        InvocationOutcome::Success {
            output: output.into(),
        }
    }

    pub fn failure(error: InvocationError) -> Self {
        InvocationOutcome::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            InvocationOutcome::Success { output } => Some(output),
            InvocationOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&InvocationError> {
        match self {
            InvocationOutcome::Success { .. } => None,
            InvocationOutcome::Failure(e) => Some(e),
        }
    }

    /// Text placed in the `tool` turn the model reads.
    pub fn render(&self) -> String {
        match self {
            InvocationOutcome::Success { output } => output.clone(),
            InvocationOutcome::Failure(e) => {
                let mut text = format!("Error ({}): {}", e.kind, e.message);
                if let Some(details) = &e.details {
                    text.push('\n');
                    text.push_str(details);
                }
                text
            }
        }
    }
}

impl From<Result<String, InvocationError>> for InvocationOutcome {
    fn from(result: Result<String, InvocationError>) -> Self {
        match result {
            Ok(output) => InvocationOutcome::Success { output },
            Err(e) => InvocationOutcome::Failure(e),
        }
    }
}
