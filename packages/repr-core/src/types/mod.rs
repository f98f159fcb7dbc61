//! Schema declaration, descriptors and the type registry.

pub mod declaration;
pub mod descriptor;
pub mod error;
pub mod field_mapping;
pub mod type_registry;

pub use declaration::{Declaration, FieldDecl, Representable};
pub use descriptor::{SchemaDescriptor, RESERVED_WIRE_KEYS, TYPE_KEY};
pub use error::SchemaError;
pub use field_mapping::{Coercion, ElementKind, FieldMapping, ScalarType, TypeRef, ValueKind};
pub use type_registry::Registry;
