use serde_json::Value as JsonValue;

use crate::config::{ReprConfig, UnknownFieldPolicy};
use crate::engine::{deserializer, serializer};
use crate::error::ReprError;
use crate::types::{FieldMapping, Registry, Representable, SchemaError};

/// State threaded through one serialization call.
#[derive(Clone, Copy)]
pub struct EncodeContext<'a> {
    registry: &'a Registry,
    config: &'a ReprConfig,
    type_name: &'static str,
}

impl<'a> EncodeContext<'a> {
    pub(crate) fn new(registry: &'a Registry, config: &'a ReprConfig, type_name: &'static str) -> Self {
        Self {
            registry,
            config,
            type_name,
        }
    }

    pub fn config(&self) -> &ReprConfig {
        self.config
    }

    /// Type whose fields are being encoded.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Encodes a nested DTO held by `field`.
    pub(crate) fn encode_object<N: Representable>(
        &self,
        value: &N,
        field: &FieldMapping,
    ) -> Result<JsonValue, ReprError> {
        let entry = self
            .registry
            .entry::<N>()
            .map_err(|source| unresolved::<N>(self.type_name, field, source))?;
        let child = EncodeContext {
            type_name: N::TYPE_NAME,
            ..*self
        };
        serializer::encode_instance(&entry, value, &child).map(JsonValue::Object)
    }
}

/// State threaded through one deserialization call.
#[derive(Clone, Copy)]
pub struct DecodeContext<'a> {
    registry: &'a Registry,
    config: &'a ReprConfig,
    type_name: &'static str,
}

impl<'a> DecodeContext<'a> {
    pub(crate) fn new(registry: &'a Registry, config: &'a ReprConfig, type_name: &'static str) -> Self {
        Self {
            registry,
            config,
            type_name,
        }
    }

    pub fn config(&self) -> &ReprConfig {
        self.config
    }

    /// Type whose fields are being decoded.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Decodes a nested DTO held by `field`.
    pub(crate) fn decode_object<N: Representable>(
        &self,
        json: &JsonValue,
        field: &FieldMapping,
    ) -> Result<N, ReprError> {
        let object = json
            .as_object()
            .ok_or_else(|| self.type_error(field, "object", json))?;
        let entry = self
            .registry
            .entry::<N>()
            .map_err(|source| unresolved::<N>(self.type_name, field, source))?;
        let child = DecodeContext {
            type_name: N::TYPE_NAME,
            ..*self
        };
        deserializer::decode_instance(&entry, object, &child)
    }

    /// Builds the error for a JSON value of the wrong kind.
    pub fn type_error(
        &self,
        field: &FieldMapping,
        expected: impl Into<String>,
        json: &JsonValue,
    ) -> ReprError {
        ReprError::FieldType {
            type_name: self.type_name.to_string(),
            field: field.name.clone(),
            wire_key: field.wire_key.clone(),
            expected: expected.into(),
            observed: json_kind(json).to_string(),
        }
    }

    /// Applies the unknown-field policy to a key no field declares.
    pub(crate) fn unknown_field(&self, wire_key: &str) -> Result<(), ReprError> {
        match self.config.unknown_fields {
            UnknownFieldPolicy::Ignore => {
                tracing::trace!(type_name = self.type_name, wire_key, "Ignoring unknown field");
                Ok(())
            }
            UnknownFieldPolicy::Reject => Err(ReprError::UnknownField {
                type_name: self.type_name.to_string(),
                wire_key: wire_key.to_string(),
            }),
        }
    }
}

fn unresolved<N: Representable>(owner: &str, field: &FieldMapping, source: SchemaError) -> ReprError {
    ReprError::SchemaDefinition(SchemaError::UnresolvedType {
        type_name: owner.to_string(),
        field: field.name.clone(),
        referenced: N::TYPE_NAME.to_string(),
        source: Box::new(source),
    })
}

/// Name of a JSON value's kind as reported in errors.
pub(crate) fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
