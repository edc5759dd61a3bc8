//! Operation domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON type of an operation parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
}

impl ParamType {
    /// JSON Schema type name
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
        }
    }

    /// Whether `value` is acceptable for this type.
    ///
    /// Integers also accept integral floats (`3.0`) and numeric strings
    /// (`"3"`), since models routinely quote ids.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => match value {
                Value::Number(n) => number_as_i64(n).is_some(),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            ParamType::Number => match value {
                Value::Number(_) => true,
                Value::String(s) => s.trim().parse::<f64>().is_ok(),
                _ => false,
            },
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

/// Integral JSON number that fits in `i64`; `3.0` counts, `1e20` does not.
pub(crate) fn number_as_i64(n: &serde_json::Number) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= -LIMIT && *f < LIMIT)
            .map(|f| f as i64)
    })
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameter specification for an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationParameter {
    /// Parameter name as the model must send it
    pub name: String,
    /// Model-facing description
    pub description: String,
    /// JSON type
    pub param_type: ParamType,
    /// Whether this parameter is required
    pub required: bool,
}

impl OperationParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: ParamType::String,
            required,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }
}

/// Declarative description of one operation.
///
/// The same value feeds the model-facing catalog and the dispatcher's
/// argument validation, so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    /// Unique, stable name (e.g. "crear_tarea")
    pub name: String,
    /// Model-facing prose
    pub description: String,
    /// Parameters in declaration order
    pub parameters: Vec<OperationParameter>,
}

impl OperationDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: OperationParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&OperationParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &OperationParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

/// Ordered, closed set of operations known to the process.
///
/// Registration order is the order the model sees in its catalog.
#[derive(Debug, Clone, Default)]
pub struct OperationCatalog {
    descriptors: Vec<OperationDescriptor>,
}

impl OperationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, rejecting blank and duplicate names
    pub fn register(&mut self, descriptor: OperationDescriptor) -> Result<(), DomainError> {
        if descriptor.name.trim().is_empty() {
            return Err(DomainError::EmptyOperationName);
        }
        if self.contains(&descriptor.name) {
            return Err(DomainError::DuplicateOperation(descriptor.name));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn descriptors(&self) -> &[OperationDescriptor] {
        &self.descriptors
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl TryFrom<Vec<OperationDescriptor>> for OperationCatalog {
    type Error = DomainError;

    fn try_from(descriptors: Vec<OperationDescriptor>) -> Result<Self, Self::Error> {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.register(descriptor)?;
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str) -> OperationDescriptor {
        OperationDescriptor::new(name, "test operation")
            .with_parameter(OperationParameter::new("id", "An id", true).with_type(ParamType::Integer))
            .with_parameter(OperationParameter::new("filter", "A filter", false))
    }

    #[test]
    fn test_catalog_keeps_registration_order() {
        let catalog =
            OperationCatalog::try_from(vec![descriptor("b"), descriptor("a"), descriptor("c")])
                .unwrap();
        let names: Vec<_> = catalog.names().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let mut catalog = OperationCatalog::new();
        catalog.register(descriptor("a")).unwrap();
        let err = catalog.register(descriptor("a")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateOperation("a".to_string()));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_integer_rejects_values_outside_i64() {
        assert!(ParamType::Integer.accepts(&json!(7)));
        assert!(ParamType::Integer.accepts(&json!(7.0)));
        assert!(ParamType::Integer.accepts(&json!(-9.0e18)));
        assert!(!ParamType::Integer.accepts(&json!(7.5)));
        assert!(!ParamType::Integer.accepts(&json!(1e20)));
        assert!(!ParamType::Integer.accepts(&json!(u64::MAX)));
    }

    #[test]
    fn test_catalog_rejects_blank_name() {
        let mut catalog = OperationCatalog::new();
        assert_eq!(
            catalog.register(descriptor("  ")).unwrap_err(),
            DomainError::EmptyOperationName
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_required_parameters() {
        let d = descriptor("a");
        let required: Vec<_> = d.required_parameters().map(|p| p.name.as_str()).collect();
        assert_eq!(required, vec!["id"]);
        assert_eq!(d.parameter("filter").unwrap().param_type, ParamType::String);
        assert!(d.parameter("missing").is_none());
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::Integer.accepts(&json!(7)));
        assert!(ParamType::Integer.accepts(&json!(7.0)));
        assert!(ParamType::Integer.accepts(&json!("7")));
        assert!(!ParamType::Integer.accepts(&json!(7.5)));
        assert!(!ParamType::Integer.accepts(&json!("seven")));
        assert!(ParamType::String.accepts(&json!("x")));
        assert!(!ParamType::String.accepts(&json!(1)));
        assert!(ParamType::Boolean.accepts(&json!(true)));
        assert!(ParamType::Number.accepts(&json!(1.5)));
    }
}
