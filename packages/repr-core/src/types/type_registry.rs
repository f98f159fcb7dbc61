use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::declaration::{Binding, Declaration, Representable};
use super::descriptor::SchemaDescriptor;
use super::error::SchemaError;
use super::field_mapping::FieldMapping;
use crate::error::ReprError;

/// Descriptor of `T` together with its typed accessors.
pub(crate) struct Registered<T> {
    pub(crate) descriptor: Arc<SchemaDescriptor>,
    pub(crate) bindings: Vec<Binding<T>>,
}

impl<T: Representable> Registered<T> {
    fn build() -> Result<Self, SchemaError> {
        let mut decl = Declaration::new();
        T::declare(&mut decl);
        let (descriptor, bindings) = decl.finish(T::TYPE_NAME)?;
        Ok(Self {
            descriptor: Arc::new(descriptor),
            bindings,
        })
    }
}

#[derive(Clone, Default)]
struct Snapshot {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    by_name: HashMap<&'static str, (TypeId, Arc<SchemaDescriptor>)>,
}

/// Registry of schema descriptors, keyed by DTO type.
///
/// Descriptors are built on first access and published atomically: readers
/// load an immutable snapshot and never block. A descriptor is fully
/// validated before it becomes visible, and once published it is never
/// replaced, so every caller observes the same `Arc` for a given type.
pub struct Registry {
    snapshot: ArcSwap<Snapshot>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.type_names())
            .finish()
    }
}

impl Registry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
        }
    }

    /// Process-wide registry used by the crate-level `to_wire`/`from_wire`.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Returns the descriptor of `T`, building and publishing it on first access.
    ///
    /// Nested types are not registered here; they resolve when first needed
    /// (see [`Registry::resolve_graph`]).
    ///
    /// # Returns
    /// `Ok(Arc<SchemaDescriptor>)` if `T` is well-formed, `Err(SchemaError)` otherwise.
    /// A failed registration publishes nothing and fails again on the next access.
    pub fn register_or_get<T: Representable>(&self) -> Result<Arc<SchemaDescriptor>, SchemaError> {
        self.entry::<T>().map(|entry| Arc::clone(&entry.descriptor))
    }

    pub(crate) fn entry<T: Representable>(&self) -> Result<Arc<Registered<T>>, SchemaError> {
        let key = TypeId::of::<T>();
        if let Some(existing) = self.snapshot.load().entries.get(&key) {
            return downcast::<T>(Arc::clone(existing));
        }

        let built = Registered::<T>::build()?;
        let descriptor = Arc::clone(&built.descriptor);
        let erased: Arc<dyn Any + Send + Sync> = Arc::new(built);

        let mut published = false;
        let mut name_taken = false;
        self.snapshot.rcu(|current| {
            published = false;
            name_taken = false;
            if current.entries.contains_key(&key) {
                return Arc::clone(current);
            }
            if let Some((owner, _)) = current.by_name.get(T::TYPE_NAME) {
                if *owner != key {
                    name_taken = true;
                    return Arc::clone(current);
                }
            }
            let mut next = Snapshot::clone(current);
            next.entries.insert(key, Arc::clone(&erased));
            next.by_name
                .insert(T::TYPE_NAME, (key, Arc::clone(&descriptor)));
            published = true;
            Arc::new(next)
        });

        if name_taken {
            return Err(SchemaError::DuplicateTypeName {
                type_name: T::TYPE_NAME.to_string(),
            });
        }

        if published {
            tracing::debug!(
                type_name = T::TYPE_NAME,
                fields = descriptor.len(),
                "Registered schema descriptor"
            );
            return downcast::<T>(erased);
        }

        // Another thread published first; its descriptor wins.
        tracing::debug!(type_name = T::TYPE_NAME, "Reusing concurrently registered descriptor");
        let winner = self
            .snapshot
            .load()
            .entries
            .get(&key)
            .cloned()
            .ok_or_else(|| SchemaError::RegistryMismatch {
                type_name: T::TYPE_NAME.to_string(),
            })?;
        downcast::<T>(winner)
    }

    /// Returns the field mapping for a wire key of `T`.
    ///
    /// # Arguments
    /// * `key` - Effective wire key, or the declared key of an aliased field
    ///
    /// # Returns
    /// `Ok(FieldMapping)` if found, `Err(ReprError::UnknownField)` if `T` has no such key.
    pub fn describe_field<T: Representable>(&self, key: &str) -> Result<FieldMapping, ReprError> {
        let descriptor = self.register_or_get::<T>()?;
        descriptor
            .find_by_key(key)
            .cloned()
            .ok_or_else(|| ReprError::UnknownField {
                type_name: T::TYPE_NAME.to_string(),
                wire_key: key.to_string(),
            })
    }

    /// Looks up an already registered descriptor by type name.
    pub fn describe(&self, type_name: &str) -> Option<Arc<SchemaDescriptor>> {
        self.snapshot
            .load()
            .by_name
            .get(type_name)
            .map(|(_, descriptor)| Arc::clone(descriptor))
    }

    /// Checks if a type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.snapshot.load().by_name.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .snapshot
            .load()
            .by_name
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names
    }

    /// All registered descriptors, sorted by type name.
    pub fn descriptors(&self) -> Vec<Arc<SchemaDescriptor>> {
        let snapshot = self.snapshot.load();
        let mut descriptors: Vec<Arc<SchemaDescriptor>> = snapshot
            .by_name
            .values()
            .map(|(_, descriptor)| Arc::clone(descriptor))
            .collect();
        descriptors.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        descriptors
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers `T` and every type reachable through its nested fields.
    ///
    /// Cycles are followed once. A nested type that fails to register is
    /// reported as [`SchemaError::UnresolvedType`] on the referencing field.
    ///
    /// # Returns
    /// `Ok(Vec<Arc<SchemaDescriptor>>)` in breadth-first order starting with `T`.
    pub fn resolve_graph<T: Representable>(&self) -> Result<Vec<Arc<SchemaDescriptor>>, SchemaError> {
        let root = self.register_or_get::<T>()?;
        let mut seen = HashSet::from([TypeId::of::<T>()]);
        let mut queue = VecDeque::from([root]);
        let mut resolved = Vec::new();

        while let Some(descriptor) = queue.pop_front() {
            for (field, nested) in descriptor.nested_refs() {
                if !seen.insert(nested.type_id()) {
                    continue;
                }
                let child = nested
                    .resolve(self)
                    .map_err(|source| SchemaError::UnresolvedType {
                        type_name: descriptor.type_name().to_string(),
                        field: field.name.clone(),
                        referenced: nested.name().to_string(),
                        source: Box::new(source),
                    })?;
                queue.push_back(child);
            }
            resolved.push(descriptor);
        }

        Ok(resolved)
    }
}

fn downcast<T: Representable>(
    entry: Arc<dyn Any + Send + Sync>,
) -> Result<Arc<Registered<T>>, SchemaError> {
    entry
        .downcast::<Registered<T>>()
        .map_err(|_| SchemaError::RegistryMismatch {
            type_name: T::TYPE_NAME.to_string(),
        })
}
