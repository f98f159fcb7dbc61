//! JSON representation engine for DTOs of discovery-generated API clients.
//!
//! DTO types declare their fields once through [`Representable`]; the
//! declaration becomes an immutable [`SchemaDescriptor`] held by a
//! [`Registry`], which drives both serialization and deserialization.

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod types;
pub mod value;

pub use codec::{ElementCodec, Nested};
pub use config::{ReprConfig, UnknownFieldPolicy};
pub use engine::{from_wire, to_wire, Representation};
pub use error::ReprError;
pub use types::{Declaration, FieldMapping, Registry, Representable, SchemaDescriptor, SchemaError};
pub use value::Value;
