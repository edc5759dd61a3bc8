//! Invocation domain module
//!
//! Follows one model-requested tool call from request to result:
//!
//! - [`RequestedCall`]: the call as the model returned it (raw argument text)
//! - [`ToolInvocation`]: decoded arguments, ready for dispatch
//! - [`InvocationOutcome`]: success payload or typed [`InvocationError`]
//! - [`InvocationResult`]: the outcome keyed by its [`CallId`]
//! - [`wire`]: the stdin/stdout envelope spoken across the executor boundary

pub mod entities;
pub mod value_objects;
pub mod wire;

pub use entities::{CallId, InvocationResult, RequestedCall, ToolInvocation};
pub use value_objects::{ErrorKind, InvocationError, InvocationOutcome};
pub use wire::{BoundaryRequest, BoundaryStatus, decode_request, decode_response, encode_response};
