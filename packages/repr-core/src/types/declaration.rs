//! Declaration surface for DTO types.
//!
//! A DTO implements [`Representable`] and lists its fields once through a
//! [`Declaration`] builder. The builder records both the wire metadata
//! ([`FieldMapping`]) and the typed accessors the serializer uses.

use std::collections::BTreeMap;

use serde_json::{Map, Value as JsonValue};

use super::descriptor::SchemaDescriptor;
use super::error::SchemaError;
use super::field_mapping::{Coercion, ElementKind, FieldMapping, TypeRef, ValueKind};
use crate::codec::{DecodeContext, ElementCodec, EncodeContext, Nested};
use crate::error::ReprError;

/// A DTO type with a declared JSON representation.
///
/// Every field of an implementor should be an `Option` so that "never set"
/// survives a round trip. Decoding starts from `Default::default()`.
pub trait Representable: Default + 'static {
    /// Name the type is registered under; also written as the `@type` tag.
    const TYPE_NAME: &'static str;

    /// Declares the fields, in the order they are written on the wire.
    fn declare(decl: &mut Declaration<Self>);
}

pub(crate) type EncodeFn<T> = Box<
    dyn Fn(&T, &FieldMapping, &EncodeContext<'_>) -> Result<Option<JsonValue>, ReprError>
        + Send
        + Sync,
>;

pub(crate) type DecodeFn<T> = Box<
    dyn Fn(&mut T, &JsonValue, &FieldMapping, &DecodeContext<'_>) -> Result<(), ReprError>
        + Send
        + Sync,
>;

/// Typed accessors for one declared field.
pub(crate) struct Binding<T> {
    pub(crate) encode: EncodeFn<T>,
    pub(crate) decode: DecodeFn<T>,
}

impl<T> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding").finish_non_exhaustive()
    }
}

/// Builder collecting the field declarations of `T`.
pub struct Declaration<T> {
    fields: Vec<FieldMapping>,
    bindings: Vec<Binding<T>>,
    aliases: BTreeMap<String, String>,
    alias_error: Option<String>,
}

/// Modifiers for the field declared last.
pub struct FieldDecl<'a> {
    mapping: &'a mut FieldMapping,
}

impl FieldDecl<'_> {
    /// Writes 64-bit integers as JSON strings.
    pub fn numeric_string(self) -> Self {
        self.mapping.coercion = Coercion::NumericString;
        self
    }

    /// Writes bytes as base64 strings.
    pub fn base64(self) -> Self {
        self.mapping.coercion = Coercion::Base64;
        self
    }

    /// Writes `null` for the field when it was never set.
    ///
    /// Rejected at registration for single nested objects and raw values,
    /// where `null` decodes as a set value.
    pub fn always_emit(self) -> Self {
        self.mapping.always_emit = true;
        self
    }
}

impl<T: 'static> Declaration<T> {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            bindings: Vec::new(),
            aliases: BTreeMap::new(),
            alias_error: None,
        }
    }

    /// Escapes a declared wire key, typically one that collides with a
    /// reserved engine key such as `@type`.
    pub fn alias(&mut self, declared_key: &str, escaped_key: &str) -> &mut Self {
        match self.aliases.get(declared_key) {
            Some(existing) if existing != escaped_key => {
                self.alias_error = Some(escaped_key.to_string());
            }
            _ => {
                self.aliases
                    .insert(declared_key.to_string(), escaped_key.to_string());
            }
        }
        self
    }

    /// Declares a scalar or raw field.
    pub fn property<C: ElementCodec>(
        &mut self,
        name: &str,
        wire_key: &str,
        get: fn(&T) -> &Option<C>,
        set: fn(&mut T) -> &mut Option<C>,
    ) -> FieldDecl<'_> {
        let mapping = FieldMapping::new(name, wire_key, ValueKind::single(C::element_kind()));
        let binding = Binding {
            encode: encoder(move |instance, field, cx| match get(instance) {
                Some(value) => value.encode(field, cx).map(Some),
                None => Ok(unset(field)),
            }),
            decode: decoder(move |instance, json, field, cx| {
                *set(instance) = if json.is_null() && !C::ACCEPTS_NULL {
                    None
                } else {
                    Some(C::decode(json, field, cx)?)
                };
                Ok(())
            }),
        };
        self.push(mapping, binding)
    }

    /// Declares an ordered list of scalar or raw elements.
    pub fn collection<C: ElementCodec>(
        &mut self,
        name: &str,
        wire_key: &str,
        get: fn(&T) -> &Option<Vec<C>>,
        set: fn(&mut T) -> &mut Option<Vec<C>>,
    ) -> FieldDecl<'_> {
        let mapping = FieldMapping::new(name, wire_key, ValueKind::List(C::element_kind()));
        let binding = Binding {
            encode: encoder(move |instance, field, cx| match get(instance) {
                Some(items) => items
                    .iter()
                    .map(|item| item.encode(field, cx))
                    .collect::<Result<Vec<_>, _>>()
                    .map(|items| Some(JsonValue::Array(items))),
                None => Ok(unset(field)),
            }),
            decode: decoder(move |instance, json, field, cx| {
                *set(instance) = match json {
                    JsonValue::Null => None,
                    JsonValue::Array(items) => Some(
                        items
                            .iter()
                            .map(|item| C::decode(item, field, cx))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    other => return Err(cx.type_error(field, "array", other)),
                };
                Ok(())
            }),
        };
        self.push(mapping, binding)
    }

    /// Declares a string-keyed map of scalar or raw values.
    pub fn hash<C: ElementCodec>(
        &mut self,
        name: &str,
        wire_key: &str,
        get: fn(&T) -> &Option<BTreeMap<String, C>>,
        set: fn(&mut T) -> &mut Option<BTreeMap<String, C>>,
    ) -> FieldDecl<'_> {
        let mapping = FieldMapping::new(name, wire_key, ValueKind::Map(C::element_kind()));
        let binding = Binding {
            encode: encoder(move |instance, field, cx| match get(instance) {
                Some(entries) => {
                    let mut object = Map::with_capacity(entries.len());
                    for (key, value) in entries {
                        object.insert(key.clone(), value.encode(field, cx)?);
                    }
                    Ok(Some(JsonValue::Object(object)))
                }
                None => Ok(unset(field)),
            }),
            decode: decoder(move |instance, json, field, cx| {
                *set(instance) = match json {
                    JsonValue::Null => None,
                    JsonValue::Object(entries) => {
                        let mut decoded = BTreeMap::new();
                        for (key, value) in entries {
                            decoded.insert(key.clone(), C::decode(value, field, cx)?);
                        }
                        Some(decoded)
                    }
                    other => return Err(cx.type_error(field, "object", other)),
                };
                Ok(())
            }),
        };
        self.push(mapping, binding)
    }

    /// Declares a nested DTO field. Explicit JSON `null` is kept as [`Nested::Null`].
    pub fn object<N: Representable>(
        &mut self,
        name: &str,
        wire_key: &str,
        get: fn(&T) -> &Option<Nested<N>>,
        set: fn(&mut T) -> &mut Option<Nested<N>>,
    ) -> FieldDecl<'_> {
        let mut mapping = FieldMapping::new(name, wire_key, ValueKind::Object);
        mapping.nested = Some(TypeRef::of::<N>());
        let binding = Binding {
            encode: encoder(move |instance, field, cx| match get(instance) {
                Some(Nested::Null) => Ok(Some(JsonValue::Null)),
                Some(Nested::Value(value)) => cx.encode_object::<N>(value, field).map(Some),
                None => Ok(unset(field)),
            }),
            decode: decoder(move |instance, json, field, cx| {
                *set(instance) = Some(match json {
                    JsonValue::Null => Nested::Null,
                    other => Nested::Value(Box::new(cx.decode_object::<N>(other, field)?)),
                });
                Ok(())
            }),
        };
        self.push(mapping, binding)
    }

    /// Declares an ordered list of nested DTOs.
    pub fn object_collection<N: Representable>(
        &mut self,
        name: &str,
        wire_key: &str,
        get: fn(&T) -> &Option<Vec<N>>,
        set: fn(&mut T) -> &mut Option<Vec<N>>,
    ) -> FieldDecl<'_> {
        let mut mapping = FieldMapping::new(name, wire_key, ValueKind::List(ElementKind::Object));
        mapping.nested = Some(TypeRef::of::<N>());
        let binding = Binding {
            encode: encoder(move |instance, field, cx| match get(instance) {
                Some(items) => items
                    .iter()
                    .map(|item| cx.encode_object(item, field))
                    .collect::<Result<Vec<_>, _>>()
                    .map(|items| Some(JsonValue::Array(items))),
                None => Ok(unset(field)),
            }),
            decode: decoder(move |instance, json, field, cx| {
                *set(instance) = match json {
                    JsonValue::Null => None,
                    JsonValue::Array(items) => Some(
                        items
                            .iter()
                            .map(|item| cx.decode_object::<N>(item, field))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                    other => return Err(cx.type_error(field, "array", other)),
                };
                Ok(())
            }),
        };
        self.push(mapping, binding)
    }

    /// Declares a string-keyed map of nested DTOs.
    pub fn object_hash<N: Representable>(
        &mut self,
        name: &str,
        wire_key: &str,
        get: fn(&T) -> &Option<BTreeMap<String, N>>,
        set: fn(&mut T) -> &mut Option<BTreeMap<String, N>>,
    ) -> FieldDecl<'_> {
        let mut mapping = FieldMapping::new(name, wire_key, ValueKind::Map(ElementKind::Object));
        mapping.nested = Some(TypeRef::of::<N>());
        let binding = Binding {
            encode: encoder(move |instance, field, cx| match get(instance) {
                Some(entries) => {
                    let mut object = Map::with_capacity(entries.len());
                    for (key, value) in entries {
                        object.insert(key.clone(), cx.encode_object(value, field)?);
                    }
                    Ok(Some(JsonValue::Object(object)))
                }
                None => Ok(unset(field)),
            }),
            decode: decoder(move |instance, json, field, cx| {
                *set(instance) = match json {
                    JsonValue::Null => None,
                    JsonValue::Object(entries) => {
                        let mut decoded = BTreeMap::new();
                        for (key, value) in entries {
                            decoded.insert(key.clone(), cx.decode_object::<N>(value, field)?);
                        }
                        Some(decoded)
                    }
                    other => return Err(cx.type_error(field, "object", other)),
                };
                Ok(())
            }),
        };
        self.push(mapping, binding)
    }

    fn push(&mut self, mapping: FieldMapping, binding: Binding<T>) -> FieldDecl<'_> {
        self.fields.push(mapping);
        self.bindings.push(binding);
        let index = self.fields.len() - 1;
        FieldDecl {
            mapping: &mut self.fields[index],
        }
    }

    /// Validates the declaration and splits it into descriptor and accessors.
    pub(crate) fn finish(
        self,
        type_name: &str,
    ) -> Result<(SchemaDescriptor, Vec<Binding<T>>), SchemaError> {
        if let Some(alias) = self.alias_error {
            return Err(SchemaError::AliasCollision {
                type_name: type_name.to_string(),
                alias,
            });
        }
        let descriptor = SchemaDescriptor::build(type_name, self.fields, self.aliases)?;
        Ok((descriptor, self.bindings))
    }
}

fn encoder<T, F>(f: F) -> EncodeFn<T>
where
    F: Fn(&T, &FieldMapping, &EncodeContext<'_>) -> Result<Option<JsonValue>, ReprError>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

fn decoder<T, F>(f: F) -> DecodeFn<T>
where
    F: Fn(&mut T, &JsonValue, &FieldMapping, &DecodeContext<'_>) -> Result<(), ReprError>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

/// Wire value for a field that was never set.
fn unset(field: &FieldMapping) -> Option<JsonValue> {
    field.always_emit.then_some(JsonValue::Null)
}
