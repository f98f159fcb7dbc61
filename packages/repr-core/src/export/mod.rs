//! Descriptor export and drift detection.
//!
//! Exported descriptors can be checked into a repository as golden files;
//! [`detect_drift`] then shows how the live declarations moved away from them.

mod document;
mod drift;

pub use document::{CatalogDoc, DescriptorDoc, FieldDoc, CATALOG_VERSION};
pub use drift::{detect_drift, Drift};
