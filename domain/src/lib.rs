//! Domain layer for atlas
//!
//! This crate contains the core entities and value objects of the
//! conversational task manager. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Operations
//!
//! A closed set of typed operations ([`OperationDescriptor`]) is advertised
//! to the model through an [`OperationCatalog`].
//!
//! ## Invocations
//!
//! Each tool call the model returns becomes a [`ToolInvocation`] and ends
//! in exactly one [`InvocationOutcome`]: a success payload or a typed
//! [`InvocationError`].
//!
//! ## Conversation
//!
//! The [`Conversation`] holds the ordered turn history and enforces that
//! every `tool` turn answers a call its assistant turn requested.

pub mod core;
pub mod invocation;
pub mod operation;
pub mod session;

// Re-export commonly used types
pub use core::error::DomainError;
pub use invocation::{
    BoundaryRequest, BoundaryStatus, CallId, ErrorKind, InvocationError, InvocationOutcome,
    InvocationResult, RequestedCall, ToolInvocation, decode_request, decode_response,
    encode_response,
};
pub use operation::{
    ArgumentValidator, OperationCatalog, OperationDescriptor, OperationParameter, ParamType,
    SchemaArgumentValidator,
};
pub use session::{
    entities::{Conversation, Role, Turn},
    response::{FinishReason, ModelReply},
};
