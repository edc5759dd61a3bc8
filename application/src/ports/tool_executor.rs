//! Tool Executor port
//!
//! Defines the interface for running one decoded invocation.

use async_trait::async_trait;
use atlas_domain::{InvocationOutcome, ToolInvocation};

/// Port for tool execution
///
/// Never fails at the Rust level: spawn failures, timeouts and protocol
/// problems all come back as [`InvocationOutcome::Failure`] with a kind.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Execute one invocation and wait for its outcome
    async fn execute(&self, invocation: &ToolInvocation) -> InvocationOutcome;
}
