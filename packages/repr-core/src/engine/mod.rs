//! Conversion between DTO instances and JSON wire documents.

pub(crate) mod deserializer;
pub(crate) mod serializer;

use std::io::{Read, Write};

use serde_json::{Map, Value as JsonValue};

use crate::codec::{json_kind, DecodeContext, EncodeContext};
use crate::config::ReprConfig;
use crate::error::ReprError;
use crate::types::{Registry, Representable, TYPE_KEY};
use crate::value::Value;

/// Serializer/deserializer bound to a registry and a configuration.
///
/// All conversions are all-or-nothing: an error never yields a partial result.
#[derive(Debug, Clone)]
pub struct Representation<'r> {
    registry: &'r Registry,
    config: ReprConfig,
}

impl Default for Representation<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Representation<'static> {
    /// Uses the global registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReprConfig::default())
    }

    /// Uses the global registry with the given configuration.
    pub fn with_config(config: ReprConfig) -> Self {
        Self {
            registry: Registry::global(),
            config,
        }
    }
}

impl<'r> Representation<'r> {
    pub fn with_registry(registry: &'r Registry, config: ReprConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn config(&self) -> &ReprConfig {
        &self.config
    }

    /// Encodes `instance` as a JSON object.
    pub fn to_json_value<T: Representable>(&self, instance: &T) -> Result<JsonValue, ReprError> {
        self.encode_object(instance).map(JsonValue::Object)
    }

    /// Encodes `instance` as a dynamic [`Value`].
    pub fn to_value<T: Representable>(&self, instance: &T) -> Result<Value, ReprError> {
        self.to_json_value(instance).map(Value::from)
    }

    /// Encodes `instance` as UTF-8 JSON bytes.
    ///
    /// # Arguments
    /// * `instance` - DTO to encode
    ///
    /// # Returns
    /// `Ok(Vec<u8>)` holding one JSON object, pretty-printed if configured.
    pub fn to_wire<T: Representable>(&self, instance: &T) -> Result<Vec<u8>, ReprError> {
        let json = self.to_json_value(instance)?;
        self.write_bytes(&json)
    }

    /// Encodes `instance` as a JSON string.
    pub fn to_json_string<T: Representable>(&self, instance: &T) -> Result<String, ReprError> {
        let json = self.to_json_value(instance)?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(text)
    }

    /// Encodes `instance` into a writer.
    pub fn to_writer<T: Representable, W: Write>(&self, instance: &T, writer: W) -> Result<(), ReprError> {
        let json = self.to_json_value(instance)?;
        if self.config.pretty {
            serde_json::to_writer_pretty(writer, &json)?;
        } else {
            serde_json::to_writer(writer, &json)?;
        }
        Ok(())
    }

    /// Decodes a JSON value, which must be an object.
    pub fn from_json_value<T: Representable>(&self, json: &JsonValue) -> Result<T, ReprError> {
        let object = expect_object::<T>(json)?;
        self.decode_object(object)
    }

    /// Decodes UTF-8 JSON bytes.
    ///
    /// # Arguments
    /// * `bytes` - Wire document holding one JSON object
    ///
    /// # Returns
    /// `Ok(T)` with every present field set, `Err(ReprError)` on malformed
    /// input, a type mismatch, or (under the reject policy) an unknown key.
    pub fn from_wire<T: Representable>(&self, bytes: &[u8]) -> Result<T, ReprError> {
        let json: JsonValue = serde_json::from_slice(bytes)?;
        self.from_json_value(&json)
    }

    /// Decodes a JSON string.
    pub fn from_json_str<T: Representable>(&self, text: &str) -> Result<T, ReprError> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.from_json_value(&json)
    }

    /// Decodes from a reader.
    pub fn from_reader<T: Representable, R: Read>(&self, reader: R) -> Result<T, ReprError> {
        let json: JsonValue = serde_json::from_reader(reader)?;
        self.from_json_value(&json)
    }

    /// Encodes `instance` with a leading `@type` key naming its type.
    pub fn to_wire_tagged<T: Representable>(&self, instance: &T) -> Result<Vec<u8>, ReprError> {
        let fields = self.encode_object(instance)?;
        let mut tagged = Map::with_capacity(fields.len() + 1);
        tagged.insert(TYPE_KEY.to_string(), JsonValue::String(T::TYPE_NAME.to_string()));
        tagged.extend(fields);
        self.write_bytes(&JsonValue::Object(tagged))
    }

    /// Decodes a document written by [`Representation::to_wire_tagged`].
    ///
    /// The `@type` key must be present and name `T`; it is removed before
    /// the remaining keys are decoded.
    pub fn from_wire_tagged<T: Representable>(&self, bytes: &[u8]) -> Result<T, ReprError> {
        let json: JsonValue = serde_json::from_slice(bytes)?;
        let mut object = match json {
            JsonValue::Object(object) => object,
            other => return Err(not_an_object::<T>(&other)),
        };

        match object.remove(TYPE_KEY) {
            None => {
                return Err(ReprError::MissingTypeTag {
                    expected: T::TYPE_NAME.to_string(),
                })
            }
            Some(JsonValue::String(tag)) if tag == T::TYPE_NAME => {}
            Some(other) => {
                return Err(ReprError::TypeTagMismatch {
                    expected: T::TYPE_NAME.to_string(),
                    found: match other {
                        JsonValue::String(tag) => tag,
                        other => other.to_string(),
                    },
                })
            }
        }

        self.decode_object(&object)
    }

    fn encode_object<T: Representable>(&self, instance: &T) -> Result<Map<String, JsonValue>, ReprError> {
        let entry = self.registry.entry::<T>()?;
        let cx = EncodeContext::new(self.registry, &self.config, T::TYPE_NAME);
        serializer::encode_instance(&entry, instance, &cx)
    }

    fn decode_object<T: Representable>(&self, object: &Map<String, JsonValue>) -> Result<T, ReprError> {
        let entry = self.registry.entry::<T>()?;
        let cx = DecodeContext::new(self.registry, &self.config, T::TYPE_NAME);
        deserializer::decode_instance(&entry, object, &cx)
    }

    fn write_bytes(&self, json: &JsonValue) -> Result<Vec<u8>, ReprError> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(json)?
        } else {
            serde_json::to_vec(json)?
        };
        Ok(bytes)
    }
}

fn expect_object<T: Representable>(json: &JsonValue) -> Result<&Map<String, JsonValue>, ReprError> {
    json.as_object().ok_or_else(|| not_an_object::<T>(json))
}

fn not_an_object<T: Representable>(json: &JsonValue) -> ReprError {
    ReprError::Malformed(format!(
        "expected a JSON object for '{}', got {}",
        T::TYPE_NAME,
        json_kind(json)
    ))
}

/// Encodes `instance` with the global registry and default configuration.
pub fn to_wire<T: Representable>(instance: &T) -> Result<Vec<u8>, ReprError> {
    Representation::new().to_wire(instance)
}

/// Decodes `bytes` with the global registry and default configuration.
pub fn from_wire<T: Representable>(bytes: &[u8]) -> Result<T, ReprError> {
    Representation::new().from_wire(bytes)
}
