//! Operation domain module
//!
//! An operation is one typed action the model may request. Every operation
//! is described by an [`OperationDescriptor`] (name, description, typed
//! parameters) and collected in an [`OperationCatalog`].
//!
//! ```text
//! ┌───────────────────┐   catalog    ┌──────────────┐
//! │ OperationCatalog  │─────────────▶│ Model        │
//! │ (descriptors)     │              └──────┬───────┘
//! └────────┬──────────┘                     │ RequestedCall
//!          │ validate                       ▼
//!          └──────────────────────▶ ToolInvocation ──▶ executor
//! ```
//!
//! The catalog is fixed at process start. Adding an operation means one
//! descriptor plus one implementation in the infrastructure layer.

pub mod entities;
pub mod traits;

pub use entities::{OperationCatalog, OperationDescriptor, OperationParameter, ParamType};
pub use traits::{ArgumentValidator, SchemaArgumentValidator};
