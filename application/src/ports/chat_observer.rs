//! Chat observer port
//!
//! Defines the callbacks the tool-call loop fires while it works.
//! Implementations live in the presentation layer.

use super::llm_gateway::GatewayError;
use atlas_domain::{InvocationResult, RequestedCall};

/// Which model query is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// First query after a user turn
    Initial,
    /// Query after tool results were appended
    FollowUp,
}

/// Callback for progress updates during one chat turn
pub trait ChatObserver: Send + Sync {
    /// Called before the model is queried
    fn on_model_query(&self, _phase: QueryPhase) {}

    /// Called when the model query returns, successfully or not
    fn on_model_done(&self, _phase: QueryPhase) {}

    /// Called before a call is dispatched (`index` is 1-based)
    fn on_tool_dispatch(&self, _call: &RequestedCall, _index: usize, _total: usize) {}

    /// Called after a call produced its result
    fn on_tool_result(&self, _result: &InvocationResult) {}

    /// Called when the model answered with text instead of a tool call
    fn on_policy_violation(&self, _text: &str) {}

    /// Called when a model query failed
    fn on_transport_error(&self, _error: &GatewayError) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoObserver;

impl ChatObserver for NoObserver {}
