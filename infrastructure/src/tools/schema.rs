//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] producing the
//! chat-completions `tools` entries:
//!
//! ```json
//! {"type": "function",
//!  "function": {"name": "...", "description": "...",
//!               "parameters": {"type": "object", "properties": {...}, "required": [...]}}}
//! ```

use atlas_application::ports::tool_schema::ToolSchemaPort;
use atlas_domain::OperationDescriptor;

/// Converts descriptors to function-calling tool entries.
///
/// `required` lists parameters in declaration order.
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    /// The `parameters` object of one descriptor.
    pub fn parameters_schema(descriptor: &OperationDescriptor) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &descriptor.parameters {
            let mut prop = serde_json::Map::new();
            prop.insert(
                "type".to_string(),
                serde_json::json!(param.param_type.as_str()),
            );
            prop.insert(
                "description".to_string(),
                serde_json::json!(param.description),
            );
            properties.insert(param.name.clone(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::json!(param.name));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn operation_to_schema(&self, descriptor: &OperationDescriptor) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": descriptor.name,
                "description": descriptor.description,
                "parameters": Self::parameters_schema(descriptor),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationRegistry;
    use atlas_domain::{OperationParameter, ParamType};

    #[test]
    fn test_operation_to_schema() {
        let converter = JsonSchemaToolConverter;
        let descriptor = OperationDescriptor::new("crear_tarea", "Crea una tarea")
            .with_parameter(
                OperationParameter::new("project_id", "ID del proyecto", true)
                    .with_type(ParamType::Integer),
            )
            .with_parameter(OperationParameter::new("description", "Título", true))
            .with_parameter(OperationParameter::new("nota", "Opcional", false));

        let schema = converter.operation_to_schema(&descriptor);

        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "crear_tarea");
        assert_eq!(schema["function"]["description"], "Crea una tarea");

        let params = &schema["function"]["parameters"];
        assert_eq!(params["type"], "object");
        assert_eq!(params["properties"]["project_id"]["type"], "integer");
        assert_eq!(params["properties"]["project_id"]["description"], "ID del proyecto");
        assert_eq!(params["properties"]["description"]["type"], "string");

        let required = params["required"].as_array().unwrap();
        assert_eq!(required, &vec![serde_json::json!("project_id"), serde_json::json!("description")]);
    }

    #[test]
    fn test_operation_without_parameters() {
        let schema = JsonSchemaToolConverter
            .operation_to_schema(&OperationDescriptor::new("ping", "No params"));
        let params = &schema["function"]["parameters"];
        assert!(params["properties"].as_object().unwrap().is_empty());
        assert!(params["required"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_builtin_catalog_fidelity() {
        let registry = OperationRegistry::builtin();
        let catalog = registry.catalog();
        let schemas = JsonSchemaToolConverter.catalog_schema(catalog);

        assert_eq!(schemas.len(), catalog.len());
        for (schema, descriptor) in schemas.iter().zip(catalog.descriptors()) {
            let function = &schema["function"];
            assert_eq!(function["name"], descriptor.name.as_str());
            assert_eq!(function["description"], descriptor.description.as_str());

            let properties = function["parameters"]["properties"].as_object().unwrap();
            assert_eq!(properties.len(), descriptor.parameters.len());
            for param in &descriptor.parameters {
                let prop = &properties[&param.name];
                assert_eq!(prop["type"], param.param_type.as_str());
                assert_eq!(prop["description"], param.description.as_str());
            }

            let required: Vec<&str> = function["parameters"]["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            let expected: Vec<&str> = descriptor
                .required_parameters()
                .map(|p| p.name.as_str())
                .collect();
            assert_eq!(required, expected);
        }
    }
}
