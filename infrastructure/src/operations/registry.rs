//! Operation registry
//!
//! The [`OperationRegistry`] maps operation names to their handlers and
//! owns the [`OperationCatalog`] advertised to the model. It is the single
//! dispatch point used by the executor boundary:
//!
//! ```text
//! dispatch(call)
//!   ├─ resolve name        → not_found if unregistered
//!   ├─ validate arguments  → invalid_arguments
//!   └─ run handler         → success | operation failure
//! ```

use super::{projects, tasks};
use crate::store::Store;
use atlas_domain::{
    ArgumentValidator, InvocationError, InvocationOutcome, OperationCatalog, OperationDescriptor,
    SchemaArgumentValidator, ToolInvocation,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Signature shared by every operation implementation
pub type OperationHandler = fn(&Store, &ToolInvocation) -> Result<String, InvocationError>;

pub struct OperationRegistry {
    catalog: OperationCatalog,
    handlers: HashMap<String, OperationHandler>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self {
            catalog: OperationCatalog::new(),
            handlers: HashMap::new(),
        }
    }

    /// Registry holding the six built-in operations.
    pub fn builtin() -> Self {
        let entries: [(OperationDescriptor, OperationHandler); 6] = [
            (
                tasks::create_task_definition(),
                tasks::execute_create_task,
            ),
            (
                tasks::update_task_status_definition(),
                tasks::execute_update_task_status,
            ),
            (
                projects::create_project_with_tasks_definition(),
                projects::execute_create_project_with_tasks,
            ),
            (
                tasks::create_reminder_definition(),
                tasks::execute_create_reminder,
            ),
            (tasks::list_tasks_definition(), tasks::execute_list_tasks),
            (
                projects::list_projects_definition(),
                projects::execute_list_projects,
            ),
        ];

        let mut registry = Self::new();
        for (descriptor, handler) in entries {
            if let Err(e) = registry.register(descriptor, handler) {
                warn!(error = %e, "Skipping built-in operation");
            }
        }
        registry
    }

    /// Add an operation. Names must be unique.
    pub fn register(
        &mut self,
        descriptor: OperationDescriptor,
        handler: OperationHandler,
    ) -> Result<(), atlas_domain::DomainError> {
        let name = descriptor.name.clone();
        self.catalog.register(descriptor)?;
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Names in registration order
    pub fn list_operations(&self) -> Vec<&str> {
        self.catalog.names().collect()
    }

    pub fn resolve(&self, name: &str) -> Option<(&OperationDescriptor, OperationHandler)> {
        let descriptor = self.catalog.get(name)?;
        let handler = self.handlers.get(name)?;
        Some((descriptor, *handler))
    }

    /// Resolve, validate and run one invocation.
    pub fn dispatch(&self, store: &Store, call: &ToolInvocation) -> InvocationOutcome {
        let Some((descriptor, handler)) = self.resolve(&call.operation_name) else {
            return InvocationOutcome::failure(InvocationError::unknown_operation(
                &call.operation_name,
            ));
        };

        if let Err(e) = SchemaArgumentValidator.validate(&call.arguments, descriptor) {
            debug!(operation = %call.operation_name, error = %e, "Rejected arguments");
            return InvocationOutcome::failure(e);
        }

        debug!(operation = %call.operation_name, "Dispatching operation");
        handler(store, call).into()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
