//! Tool schema conversion port.
//!
//! Separates "which operations exist" (domain) from "how to serialize them
//! for the API" (infrastructure).

use atlas_domain::{OperationCatalog, OperationDescriptor};

/// Port for converting operation descriptors to the model API's tool format.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single descriptor.
    fn operation_to_schema(&self, descriptor: &OperationDescriptor) -> serde_json::Value;

    /// Convert the whole catalog, in registration order.
    fn catalog_schema(&self, catalog: &OperationCatalog) -> Vec<serde_json::Value> {
        catalog
            .descriptors()
            .iter()
            .map(|d| self.operation_to_schema(d))
            .collect()
    }
}
