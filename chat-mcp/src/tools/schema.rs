//! Input schemas and parameter validation
//!
//! Schemas are a deliberately small subset of JSON Schema: a flat object
//! whose properties each declare one primitive kind. Validation stops at the
//! first violation:
//!
//! 1. every `required` name (in declared order) must be present
//! 2. every present parameter that is declared must match its kind
//!
//! Undeclared parameters are ignored. `enum` and `default` are descriptive
//! unless [`ValidationOptions::enforce_enum`] is set.

use indexmap::IndexMap;
use mcp_protocol::McpError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Params;

// ============================================================================
// Schema types
// ============================================================================

/// Declared kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    /// Whether a JSON value has this kind. `null` matches nothing.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            PropertyType::String => value.is_string(),
            PropertyType::Number => value.is_number(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Object => value.is_object(),
            PropertyType::Array => value.is_array(),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::String => write!(f, "string"),
            PropertyType::Number => write!(f, "number"),
            PropertyType::Boolean => write!(f, "boolean"),
            PropertyType::Object => write!(f, "object"),
            PropertyType::Array => write!(f, "array"),
        }
    }
}

/// Declaration of a single parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl PropertySchema {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            description: None,
            enum_values: None,
            default: None,
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyType::String)
    }

    pub fn number() -> Self {
        Self::new(PropertyType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(PropertyType::Boolean)
    }

    pub fn object() -> Self {
        Self::new(PropertyType::Object)
    }

    pub fn array() -> Self {
        Self::new(PropertyType::Array)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Object schema describing a tool's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

fn object_type() -> String {
    "object".to_string()
}

impl Default for InputSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSchema {
    pub fn new() -> Self {
        Self {
            schema_type: object_type(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    /// Declare (or redeclare) a property
    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property name as required
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Strict well-formedness check
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.schema_type != "object" {
            return Err(SchemaError::NotAnObject(self.schema_type.clone()));
        }

        for (i, name) in self.required.iter().enumerate() {
            if self.required[..i].contains(name) {
                return Err(SchemaError::DuplicateRequired(name.clone()));
            }
            if !self.properties.contains_key(name) {
                return Err(SchemaError::UndeclaredRequired(name.clone()));
            }
        }

        Ok(())
    }
}

/// Malformed schema, reported only in strict mode
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("schema type must be 'object', got '{0}'")]
    NotAnObject(String),

    #[error("required parameter '{0}' is not declared in properties")]
    UndeclaredRequired(String),

    #[error("required parameter '{0}' is listed more than once")]
    DuplicateRequired(String),
}

// ============================================================================
// Validation
// ============================================================================

/// Knobs for [`validate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reject string values outside a property's declared `enum`
    pub enforce_enum: bool,
}

/// Check parsed parameters against a schema, returning the first violation
pub fn validate(
    params: &Params,
    schema: &InputSchema,
    options: &ValidationOptions,
) -> Result<(), McpError> {
    for name in &schema.required {
        if !params.contains_key(name) {
            return Err(McpError::invalid_params(format!(
                "Missing required parameter: {}",
                name
            )));
        }
    }

    for (name, value) in params {
        let Some(property) = schema.properties.get(name) else {
            continue;
        };

        if !property.property_type.matches(value) {
            let message = match property.property_type {
                PropertyType::Array => format!("Parameter '{}' must be an array", name),
                other => format!("Parameter '{}' must be of type {}", name, other),
            };
            return Err(McpError::invalid_params(message));
        }

        if options.enforce_enum {
            if let (Some(allowed), Some(actual)) = (&property.enum_values, value.as_str()) {
                if !allowed.iter().any(|v| v == actual) {
                    return Err(McpError::invalid_params(format!(
                        "Parameter '{}' must be one of: {}",
                        name,
                        allowed.join(", ")
                    )));
                }
            }
        }
    }

    Ok(())
}
