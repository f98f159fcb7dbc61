//! Serializable descriptor and catalog documents.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::ReprError;
use crate::types::{Coercion, Registry, SchemaDescriptor, ValueKind};

/// Catalog file format version.
pub const CATALOG_VERSION: u32 = 1;

/// Exported form of one field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDoc {
    /// Logical field name
    pub name: String,
    /// Effective wire key
    pub wire_key: String,
    /// Declared wire key (differs from `wire_key` when aliased)
    pub declared_key: String,
    /// Value kind
    pub kind: ValueKind,
    /// Scalar coercion
    #[serde(default)]
    pub coercion: Coercion,
    /// Nested type name for object-valued kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<String>,
    /// Written as `null` when unset
    #[serde(default)]
    pub always_emit: bool,
}

/// Exported form of a schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDoc {
    /// Type name
    pub type_name: String,
    /// Fields in declaration order
    pub fields: Vec<FieldDoc>,
}

impl DescriptorDoc {
    /// CRC32 of the canonical (compact JSON) form.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = Hasher::new();
        // Serializing plain strings, enums and bools cannot fail.
        if let Ok(bytes) = serde_json::to_vec(self) {
            hasher.update(&bytes);
        }
        hasher.finalize()
    }
}

impl SchemaDescriptor {
    /// Exports the descriptor as a serializable document.
    pub fn export(&self) -> DescriptorDoc {
        DescriptorDoc {
            type_name: self.type_name().to_string(),
            fields: self
                .fields()
                .iter()
                .map(|field| FieldDoc {
                    name: field.name.clone(),
                    wire_key: field.wire_key.clone(),
                    declared_key: field.declared_key.clone(),
                    kind: field.kind,
                    coercion: field.coercion,
                    nested: field.nested.map(|nested| nested.name().to_string()),
                    always_emit: field.always_emit,
                })
                .collect(),
        }
    }
}

/// Catalog file format: every registered descriptor plus per-type checksums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDoc {
    /// Catalog version
    pub version: u32,
    /// Descriptor documents by type name
    pub types: BTreeMap<String, DescriptorDoc>,
    /// Descriptor fingerprints for corruption detection
    #[serde(default)]
    pub checksums: BTreeMap<String, u32>,
}

impl Default for CatalogDoc {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            types: BTreeMap::new(),
            checksums: BTreeMap::new(),
        }
    }
}

impl CatalogDoc {
    /// Adds (or replaces) a descriptor document and its checksum.
    pub fn insert(&mut self, doc: DescriptorDoc) {
        self.checksums.insert(doc.type_name.clone(), doc.fingerprint());
        self.types.insert(doc.type_name.clone(), doc);
    }

    pub fn get(&self, type_name: &str) -> Option<&DescriptorDoc> {
        self.types.get(type_name)
    }

    /// Checks version and checksums.
    ///
    /// # Returns
    /// `Ok(())` if every document matches its recorded checksum, `Err(ReprError::Malformed)` otherwise.
    pub fn verify(&self) -> Result<(), ReprError> {
        if self.version != CATALOG_VERSION {
            return Err(ReprError::Malformed(format!(
                "Unsupported catalog version {} (expected {})",
                self.version, CATALOG_VERSION
            )));
        }
        for (type_name, doc) in &self.types {
            if doc.type_name != *type_name {
                return Err(ReprError::Malformed(format!(
                    "Catalog entry '{}' describes type '{}'",
                    type_name, doc.type_name
                )));
            }
            if let Some(expected) = self.checksums.get(type_name) {
                let actual = doc.fingerprint();
                if actual != *expected {
                    return Err(ReprError::Malformed(format!(
                        "Checksum mismatch for type '{}': expected {:08x}, got {:08x}",
                        type_name, expected, actual
                    )));
                }
            }
        }
        Ok(())
    }

    /// Writes the catalog as pretty JSON, via a temporary file and rename.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ReprError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        let mut temp_path = path.as_os_str().to_owned();
        temp_path.push(".tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        tracing::debug!(path = %path.display(), types = self.types.len(), "Saved descriptor catalog");
        Ok(())
    }

    /// Reads and verifies a catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReprError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let catalog: CatalogDoc = serde_json::from_str(&contents)?;
        catalog.verify()?;
        Ok(catalog)
    }
}

impl Registry {
    /// Exports every registered descriptor.
    pub fn export_catalog(&self) -> CatalogDoc {
        let mut catalog = CatalogDoc::default();
        for descriptor in self.descriptors() {
            catalog.insert(descriptor.export());
        }
        catalog
    }
}
