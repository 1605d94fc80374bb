// Input schema validation
//
// This module declares the per-tool input schema and validates raw input
// against it before any handler runs. Validation has no side effects and is
// fully deterministic given the same schema and input.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::DispatchError;

/// Primitive types accepted by input schemas
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

/// A single declared input field
#[derive(Clone, Debug, Serialize)]
pub struct SchemaField {
    /// Name of the field
    pub name: String,
    /// Description of the field
    pub description: String,
    /// Declared primitive type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be present
    pub required: bool,
}

/// Declared input schema for a tool
#[derive(Clone, Debug, Default, Serialize)]
pub struct InputSchema {
    pub fields: Vec<SchemaField>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required field
    pub fn required(self, name: &str, field_type: FieldType, description: &str) -> Self {
        self.push(name, field_type, description, true)
    }

    /// Declare an optional field
    pub fn optional(self, name: &str, field_type: FieldType, description: &str) -> Self {
        self.push(name, field_type, description, false)
    }

    fn push(mut self, name: &str, field_type: FieldType, description: &str, required: bool) -> Self {
        self.fields.push(SchemaField {
            name: name.to_string(),
            description: description.to_string(),
            field_type,
            required,
        });
        self
    }

    /// Validate raw input against this schema. Every offending field is
    /// collected and named in the error so the caller sees the full picture
    /// in one round trip.
    pub fn validate(&self, input: &Value) -> Result<(), DispatchError> {
        let empty = Map::new();
        let map = match input {
            Value::Object(map) => map,
            Value::Null => &empty,
            _ => {
                return Err(DispatchError::Validation(
                    "input must be an object".to_string(),
                ))
            }
        };

        let mut problems = Vec::new();
        for field in &self.fields {
            match map.get(&field.name) {
                None if field.required => {
                    problems.push(format!("missing required field '{}'", field.name));
                }
                None => {}
                Some(value) if !field.field_type.matches(value) => {
                    problems.push(format!(
                        "field '{}' must be a {}",
                        field.name, field.field_type
                    ));
                }
                Some(_) => {}
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Validation(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> InputSchema {
        InputSchema::new()
            .required("name", FieldType::String, "Full name")
            .required("email", FieldType::String, "Email address")
            .optional("age", FieldType::Number, "Age in years")
    }

    #[test]
    fn valid_input_passes() {
        let input = json!({"name": "A", "email": "a@example.com", "age": 30});
        assert!(user_schema().validate(&input).is_ok());
    }

    #[test]
    fn absent_optional_field_passes() {
        let input = json!({"name": "A", "email": "a@example.com"});
        assert!(user_schema().validate(&input).is_ok());
    }

    #[test]
    fn missing_required_field_is_named() {
        let input = json!({"name": "A"});
        let err = user_schema().validate(&input).unwrap_err();
        assert!(err.to_string().contains("email"));
    }

    #[test]
    fn wrong_typed_field_is_named() {
        let input = json!({"name": "A", "email": "a@example.com", "age": "thirty"});
        let err = user_schema().validate(&input).unwrap_err();
        assert!(err.to_string().contains("'age' must be a number"));
    }

    #[test]
    fn all_offending_fields_are_reported_together() {
        let input = json!({"name": 7});
        let err = user_schema().validate(&input).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'name' must be a string"));
        assert!(message.contains("missing required field 'email'"));
    }

    #[test]
    fn null_input_counts_as_empty_object() {
        let schema = InputSchema::new().optional("note", FieldType::String, "Note");
        assert!(schema.validate(&Value::Null).is_ok());
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = user_schema().validate(&json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }
}
