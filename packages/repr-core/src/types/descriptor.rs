//! Immutable per-type schema descriptor.

use std::collections::{BTreeMap, HashMap};

use super::error::SchemaError;
use super::field_mapping::{FieldMapping, TypeRef};

/// JSON key of the type-discrimination envelope.
pub const TYPE_KEY: &str = "@type";

/// Wire keys owned by the engine itself. A field declaring one of these must
/// be escaped through the descriptor's alias table.
pub const RESERVED_WIRE_KEYS: &[&str] = &[TYPE_KEY];

/// Describes how one DTO type maps to a JSON object.
///
/// Fields are kept in declaration order; serialization emits keys in that
/// order. A descriptor is validated once when built and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct SchemaDescriptor {
    type_name: String,
    fields: Vec<FieldMapping>,
    /// Declared wire key -> escaped wire key
    aliases: BTreeMap<String, String>,
    by_wire_key: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl SchemaDescriptor {
    /// Builds and validates a descriptor.
    ///
    /// # Arguments
    /// * `type_name` - Name of the described type
    /// * `fields` - Field mappings in declaration order
    /// * `aliases` - Alias table mapping declared wire keys to escaped keys
    ///
    /// # Returns
    /// `Ok(SchemaDescriptor)` if the declaration is well-formed, `Err(SchemaError)` otherwise.
    pub fn build(
        type_name: impl Into<String>,
        mut fields: Vec<FieldMapping>,
        aliases: BTreeMap<String, String>,
    ) -> Result<Self, SchemaError> {
        let type_name = type_name.into();

        for declared in aliases.keys() {
            if !fields.iter().any(|f| &f.declared_key == declared) {
                return Err(SchemaError::DanglingAlias {
                    type_name,
                    wire_key: declared.clone(),
                });
            }
        }

        for field in &mut fields {
            if let Some(escaped) = aliases.get(&field.declared_key) {
                field.wire_key = escaped.clone();
            }
        }

        let mut by_wire_key = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            field.validate(&type_name)?;

            if RESERVED_WIRE_KEYS.contains(&field.wire_key.as_str()) {
                if field.is_aliased() {
                    return Err(SchemaError::AliasCollision {
                        type_name,
                        alias: field.wire_key.clone(),
                    });
                }
                return Err(SchemaError::ReservedKey {
                    type_name,
                    field: field.name.clone(),
                    wire_key: field.wire_key.clone(),
                });
            }

            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateFieldName {
                    type_name,
                    field: field.name.clone(),
                });
            }

            if let Some(previous) = by_wire_key.insert(field.wire_key.clone(), index) {
                if field.is_aliased() || fields[previous].is_aliased() {
                    return Err(SchemaError::AliasCollision {
                        type_name,
                        alias: field.wire_key.clone(),
                    });
                }
                return Err(SchemaError::DuplicateWireKey {
                    type_name,
                    wire_key: field.wire_key.clone(),
                });
            }
        }

        Ok(Self {
            type_name,
            fields,
            aliases,
            by_wire_key,
            by_name,
        })
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field mappings in declaration order.
    pub fn fields(&self) -> &[FieldMapping] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Alias table (declared wire key -> escaped wire key).
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Position of the field whose effective wire key is `wire_key`.
    pub fn index_of(&self, wire_key: &str) -> Option<usize> {
        self.by_wire_key.get(wire_key).copied()
    }

    /// Position of the field keyed by `key`, either its effective wire key or
    /// the declared key of an aliased field.
    pub fn resolve_index(&self, key: &str) -> Option<usize> {
        match self.by_wire_key.get(key) {
            Some(index) => Some(*index),
            None => {
                let escaped = self.aliases.get(key)?;
                self.by_wire_key.get(escaped).copied()
            }
        }
    }

    /// Looks up a field by effective wire key, or by the declared key of an aliased field.
    pub fn find_by_key(&self, key: &str) -> Option<&FieldMapping> {
        self.resolve_index(key).and_then(|index| self.fields.get(index))
    }

    /// Looks up a field by logical name.
    pub fn find_by_name(&self, name: &str) -> Option<&FieldMapping> {
        self.by_name.get(name).and_then(|index| self.fields.get(*index))
    }

    /// Nested-type references in declaration order.
    pub fn nested_refs(&self) -> impl Iterator<Item = (&FieldMapping, TypeRef)> + '_ {
        self.fields
            .iter()
            .filter_map(|field| field.nested.map(|nested| (field, nested)))
    }
}
