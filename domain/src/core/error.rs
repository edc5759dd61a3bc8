//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are invariant violations on domain state. Failures of a single tool
/// invocation are not errors at this level; they are carried as
/// [`InvocationOutcome::Failure`](crate::invocation::InvocationOutcome).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Operation '{0}' is already registered")]
    DuplicateOperation(String),

    #[error("Operation name must not be empty")]
    EmptyOperationName,

    #[error("Tool result for call '{0}' has no matching assistant request")]
    UnrequestedToolResult(String),

    #[error("Tool result for call '{0}' was already recorded")]
    DuplicateToolResult(String),
}

impl DomainError {
    /// Check if this error concerns conversation ordering
    pub fn is_ordering_violation(&self) -> bool {
        matches!(
            self,
            DomainError::UnrequestedToolResult(_) | DomainError::DuplicateToolResult(_)
        )
    }
}
