//! Representation error types.

use thiserror::Error;

use crate::types::SchemaError;

/// Errors raised while converting between DTOs and JSON.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReprError {
    /// The DTO's declaration (or a nested one) is malformed
    #[error("Schema definition error: {0}")]
    SchemaDefinition(#[from] SchemaError),

    /// A JSON value has the wrong kind for its field
    #[error("Field '{field}' (wire key '{wire_key}') of '{type_name}': expected {expected}, got {observed}")]
    FieldType {
        type_name: String,
        field: String,
        wire_key: String,
        expected: String,
        observed: String,
    },

    /// A JSON key matches no declared field
    #[error("Unknown field '{wire_key}' for type '{type_name}'")]
    UnknownField { type_name: String, wire_key: String },

    /// The input is not valid JSON, or not a JSON object
    #[error("Malformed wire document: {0}")]
    Malformed(String),

    /// A tagged document has no `@type` key
    #[error("Wire document for '{expected}' has no '@type' tag")]
    MissingTypeTag { expected: String },

    /// A tagged document names a different type
    #[error("Type tag mismatch: expected '{expected}', found '{found}'")]
    TypeTagMismatch { expected: String, found: String },

    /// Invalid configuration value or file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reader/writer or file failure
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ReprError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            ReprError::Io(err.to_string())
        } else {
            ReprError::Malformed(err.to_string())
        }
    }
}

impl From<std::io::Error> for ReprError {
    fn from(err: std::io::Error) -> Self {
        ReprError::Io(err.to_string())
    }
}
