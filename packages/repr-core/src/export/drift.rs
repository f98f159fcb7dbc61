//! Drift detection between an exported descriptor and the live one.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::document::{DescriptorDoc, FieldDoc};
use crate::types::SchemaDescriptor;

/// One difference between an expected and an actual descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "drift", rename_all = "snake_case")]
pub enum Drift {
    /// Field present only in the live descriptor
    Added { wire_key: String },
    /// Field present only in the expected document
    Removed { wire_key: String },
    /// Same wire key, different mapping
    Changed {
        wire_key: String,
        was: FieldDoc,
        now: FieldDoc,
    },
    /// Shared fields appear in a different order
    Reordered {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Drift::Added { wire_key } => write!(f, "added field '{}'", wire_key),
            Drift::Removed { wire_key } => write!(f, "removed field '{}'", wire_key),
            Drift::Changed { wire_key, was, now } => write!(
                f,
                "changed field '{}': {} ({}) -> {} ({})",
                wire_key, was.kind, was.coercion, now.kind, now.coercion
            ),
            Drift::Reordered { expected, actual } => write!(
                f,
                "field order changed: [{}] -> [{}]",
                expected.join(", "),
                actual.join(", ")
            ),
        }
    }
}

/// Compares an expected descriptor document with a live descriptor.
///
/// Fields are matched by effective wire key. Removed fields are reported in
/// expected order, added and changed fields in live order, and a single
/// `Reordered` entry covers the fields both sides share.
///
/// # Returns
/// An empty vector when the two describe the same wire format.
pub fn detect_drift(expected: &DescriptorDoc, actual: &SchemaDescriptor) -> Vec<Drift> {
    let actual = actual.export();
    let mut drift = Vec::new();

    let expected_by_key: HashMap<&str, &FieldDoc> = expected
        .fields
        .iter()
        .map(|field| (field.wire_key.as_str(), field))
        .collect();
    let actual_by_key: HashMap<&str, &FieldDoc> = actual
        .fields
        .iter()
        .map(|field| (field.wire_key.as_str(), field))
        .collect();

    for field in &expected.fields {
        if !actual_by_key.contains_key(field.wire_key.as_str()) {
            drift.push(Drift::Removed {
                wire_key: field.wire_key.clone(),
            });
        }
    }

    for field in &actual.fields {
        match expected_by_key.get(field.wire_key.as_str()) {
            None => drift.push(Drift::Added {
                wire_key: field.wire_key.clone(),
            }),
            Some(was) if *was != field => drift.push(Drift::Changed {
                wire_key: field.wire_key.clone(),
                was: (*was).clone(),
                now: field.clone(),
            }),
            Some(_) => {}
        }
    }

    let shared_expected: Vec<String> = expected
        .fields
        .iter()
        .filter(|field| actual_by_key.contains_key(field.wire_key.as_str()))
        .map(|field| field.wire_key.clone())
        .collect();
    let shared_actual: Vec<String> = actual
        .fields
        .iter()
        .filter(|field| expected_by_key.contains_key(field.wire_key.as_str()))
        .map(|field| field.wire_key.clone())
        .collect();
    if shared_expected != shared_actual {
        drift.push(Drift::Reordered {
            expected: shared_expected,
            actual: shared_actual,
        });
    }

    if !drift.is_empty() {
        tracing::debug!(
            type_name = %expected.type_name,
            differences = drift.len(),
            "Descriptor drift detected"
        );
    }
    drift
}
