//! Operation domain traits
//!
//! Contains pure argument validation. Execution lives behind the
//! application layer's `ToolExecutorPort`.

use super::entities::OperationDescriptor;
use crate::invocation::value_objects::InvocationError;
use serde_json::{Map, Value};

/// Validator for invocation arguments
pub trait ArgumentValidator {
    /// Validate `arguments` against `descriptor`
    fn validate(
        &self,
        arguments: &Map<String, Value>,
        descriptor: &OperationDescriptor,
    ) -> Result<(), InvocationError>;
}

/// Checks required, unknown and mistyped arguments.
///
/// An explicit `null` counts as absent.
#[derive(Debug, Clone, Default)]
pub struct SchemaArgumentValidator;

impl ArgumentValidator for SchemaArgumentValidator {
    fn validate(
        &self,
        arguments: &Map<String, Value>,
        descriptor: &OperationDescriptor,
    ) -> Result<(), InvocationError> {
        for param in &descriptor.parameters {
            let value = arguments.get(&param.name).filter(|v| !v.is_null());
            match value {
                None if param.required => {
                    return Err(InvocationError::invalid_arguments(format!(
                        "Missing required parameter '{}' for operation '{}'",
                        param.name, descriptor.name
                    )));
                }
                Some(v) if !param.param_type.accepts(v) => {
                    return Err(InvocationError::invalid_arguments(format!(
                        "Parameter '{}' for operation '{}' must be of type {}",
                        param.name, descriptor.name, param.param_type
                    ))
                    .with_details(format!("received: {}", v)));
                }
                _ => {}
            }
        }

        for arg_name in arguments.keys() {
            if descriptor.parameter(arg_name).is_none() {
                return Err(InvocationError::invalid_arguments(format!(
                    "Unknown parameter '{}' for operation '{}'",
                    arg_name, descriptor.name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::value_objects::ErrorKind;
    use crate::operation::entities::{OperationParameter, ParamType};
    use serde_json::json;

    fn definition() -> OperationDescriptor {
        OperationDescriptor::new("test", "test operation")
            .with_parameter(
                OperationParameter::new("task_id", "A required id", true)
                    .with_type(ParamType::Integer),
            )
            .with_parameter(OperationParameter::new("status", "An optional filter", false))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_validator_missing_required() {
        let err = SchemaArgumentValidator
            .validate(&args(json!({"status": "Hecha"})), &definition())
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArguments);
        assert!(err.message.contains("Missing required parameter 'task_id'"));
    }

    #[test]
    fn test_validator_null_required_is_missing() {
        let err = SchemaArgumentValidator
            .validate(&args(json!({"task_id": null})), &definition())
            .unwrap_err();
        assert!(err.message.contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let err = SchemaArgumentValidator
            .validate(&args(json!({"task_id": 1, "owner": "ana"})), &definition())
            .unwrap_err();
        assert!(err.message.contains("Unknown parameter 'owner'"));
    }

    #[test]
    fn test_validator_type_mismatch() {
        let err = SchemaArgumentValidator
            .validate(&args(json!({"task_id": "abc"})), &definition())
            .unwrap_err();
        assert!(err.message.contains("must be of type integer"));
        assert_eq!(err.details.as_deref(), Some("received: \"abc\""));
    }

    #[test]
    fn test_validator_valid_call() {
        assert!(
            SchemaArgumentValidator
                .validate(&args(json!({"task_id": 3, "status": null})), &definition())
                .is_ok()
        );
        assert!(
            SchemaArgumentValidator
                .validate(&args(json!({"task_id": "3", "status": "Hecha"})), &definition())
                .is_ok()
        );
    }
}
