//! Wire mapping metadata for a single declared field.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::declaration::Representable;
use super::descriptor::SchemaDescriptor;
use super::error::SchemaError;
use super::type_registry::Registry;

/// Scalar types a field (or a list/map element) can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    Bool,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    Bytes,
}

impl ScalarType {
    /// Short lowercase name used in error messages and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::Int32 => "int32",
            ScalarType::UInt32 => "uint32",
            ScalarType::Int64 => "int64",
            ScalarType::UInt64 => "uint64",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    /// Returns `true` for integers wider than the 53 bits a JSON number keeps exactly.
    pub fn is_wide_integer(&self) -> bool {
        matches!(self, ScalarType::Int64 | ScalarType::UInt64)
    }
}

/// Kind of a single value: a field's own value, or one element of a list/map field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Scalar(ScalarType),
    Object,
    Raw,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Scalar(scalar) => f.write_str(scalar.as_str()),
            ElementKind::Object => f.write_str("object"),
            ElementKind::Raw => f.write_str("raw"),
        }
    }
}

/// Kind of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Single scalar value
    Scalar(ScalarType),
    /// Nested DTO described by its own descriptor
    Object,
    /// Ordered list of elements
    List(ElementKind),
    /// String-keyed map of elements
    Map(ElementKind),
    /// Untyped JSON passed through unchanged
    Raw,
}

impl ValueKind {
    /// Builds the field kind for a single (non-collection) element kind.
    pub fn single(element: ElementKind) -> Self {
        match element {
            ElementKind::Scalar(scalar) => ValueKind::Scalar(scalar),
            ElementKind::Object => ValueKind::Object,
            ElementKind::Raw => ValueKind::Raw,
        }
    }

    /// Kind of each value carried by the field (the field itself for singular kinds).
    pub fn element(&self) -> ElementKind {
        match self {
            ValueKind::Scalar(scalar) => ElementKind::Scalar(*scalar),
            ValueKind::Object => ElementKind::Object,
            ValueKind::List(element) | ValueKind::Map(element) => *element,
            ValueKind::Raw => ElementKind::Raw,
        }
    }

    /// Returns `true` if the field needs a nested-type reference.
    pub fn expects_nested(&self) -> bool {
        self.element() == ElementKind::Object
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Scalar(scalar) => f.write_str(scalar.as_str()),
            ValueKind::Object => f.write_str("object"),
            ValueKind::List(element) => write!(f, "list<{}>", element),
            ValueKind::Map(element) => write!(f, "map<{}>", element),
            ValueKind::Raw => f.write_str("raw"),
        }
    }
}

/// Transformation applied to a scalar when it crosses the JSON boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    /// Value written with its natural JSON type
    #[default]
    Default,
    /// 64-bit integer written as a decimal JSON string
    NumericString,
    /// Byte sequence written as a standard base64 string
    Base64,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Default => f.write_str("default"),
            Coercion::NumericString => f.write_str("numeric_string"),
            Coercion::Base64 => f.write_str("base64"),
        }
    }
}

/// Resolver signature for a nested-type reference.
pub type DescribeFn = fn(&Registry) -> Result<Arc<SchemaDescriptor>, SchemaError>;

/// Handle to a nested DTO type, resolved through the registry on first use.
///
/// Holding a handle never builds the referenced descriptor, so two types may
/// reference each other without recursing at registration time.
#[derive(Clone, Copy)]
pub struct TypeRef {
    name: &'static str,
    type_id: TypeId,
    describe: DescribeFn,
}

impl TypeRef {
    /// Creates a handle to `N`.
    pub fn of<N: Representable>() -> Self {
        Self {
            name: N::TYPE_NAME,
            type_id: TypeId::of::<N>(),
            describe: describe_in::<N>,
        }
    }

    /// Type name of the referenced DTO.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runtime identity of the referenced DTO.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Resolves the handle, registering the referenced type if needed.
    pub fn resolve(&self, registry: &Registry) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        (self.describe)(registry)
    }
}

fn describe_in<N: Representable>(registry: &Registry) -> Result<Arc<SchemaDescriptor>, SchemaError> {
    registry.register_or_get::<N>()
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name).finish()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeRef {}

/// Wire mapping of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Logical (Rust-side) field name
    pub name: String,
    /// Effective JSON key, after the descriptor's alias table is applied
    pub wire_key: String,
    /// JSON key as declared; differs from `wire_key` only for aliased fields
    pub declared_key: String,
    /// Value kind
    pub kind: ValueKind,
    /// Scalar coercion applied to the field (or to each element)
    pub coercion: Coercion,
    /// Nested DTO type for object-valued kinds
    pub nested: Option<TypeRef>,
    /// Emit `null` for the field even when it was never set
    pub always_emit: bool,
}

impl FieldMapping {
    /// Creates a mapping with default coercion and no nested reference.
    pub fn new(name: impl Into<String>, wire_key: impl Into<String>, kind: ValueKind) -> Self {
        let wire_key = wire_key.into();
        Self {
            name: name.into(),
            declared_key: wire_key.clone(),
            wire_key,
            kind,
            coercion: Coercion::Default,
            nested: None,
            always_emit: false,
        }
    }

    /// Returns `true` if the alias table rewrote the declared key.
    pub fn is_aliased(&self) -> bool {
        self.wire_key != self.declared_key
    }

    /// Checks kind, nesting and coercion for consistency.
    ///
    /// # Arguments
    /// * `type_name` - Owning type, used in error messages
    ///
    /// # Returns
    /// `Ok(())` if consistent, `Err(SchemaError)` otherwise.
    pub(crate) fn validate(&self, type_name: &str) -> Result<(), SchemaError> {
        if self.declared_key.is_empty() || self.wire_key.is_empty() {
            return Err(SchemaError::EmptyWireKey {
                type_name: type_name.to_string(),
                field: self.name.clone(),
            });
        }

        match (self.kind.expects_nested(), self.nested.is_some()) {
            (true, false) => {
                return Err(SchemaError::InconsistentNesting {
                    type_name: type_name.to_string(),
                    field: self.name.clone(),
                    message: format!("{} field has no nested type", self.kind),
                });
            }
            (false, true) => {
                return Err(SchemaError::InconsistentNesting {
                    type_name: type_name.to_string(),
                    field: self.name.clone(),
                    message: format!("{} field cannot reference a nested type", self.kind),
                });
            }
            _ => {}
        }

        // Unset is written as null, which single object and raw fields decode as a value.
        if self.always_emit && matches!(self.kind, ValueKind::Object | ValueKind::Raw) {
            return Err(SchemaError::InvalidAlwaysEmit {
                type_name: type_name.to_string(),
                field: self.name.clone(),
                kind: self.kind.to_string(),
            });
        }

        let element = self.kind.element();
        let valid = match self.coercion {
            Coercion::Default => element != ElementKind::Scalar(ScalarType::Bytes),
            Coercion::NumericString => {
                matches!(element, ElementKind::Scalar(scalar) if scalar.is_wide_integer())
            }
            Coercion::Base64 => element == ElementKind::Scalar(ScalarType::Bytes),
        };
        if !valid {
            return Err(SchemaError::InvalidCoercion {
                type_name: type_name.to_string(),
                field: self.name.clone(),
                coercion: self.coercion.to_string(),
                kind: self.kind.to_string(),
            });
        }

        Ok(())
    }
}
