//! Document walking and per-path observation collection
//!
//! Walking flattens each sampled document into dotted-path observations. The
//! accumulator is explicit state owned by a single analysis pass: walking
//! appends to it, unification reads from it, and nothing is shared between
//! passes.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::infer::infer_bounded;
use super::shapes;
use crate::models::{FieldType, PRIMARY_ID_FIELD};

/// Observations collected for one dotted path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathObservations {
    /// Types in observation order; the first entry wins type conflicts
    pub types: Vec<FieldType>,
    /// Raw string occurrences, kept for enum detection at unification time
    pub strings: Vec<String>,
}

impl PathObservations {
    /// True when every observation at this path was a string value
    pub fn all_strings(&self) -> bool {
        !self.types.is_empty() && self.strings.len() == self.types.len()
    }

    /// First observed type, if any
    pub fn first_type(&self) -> Option<&FieldType> {
        self.types.first()
    }
}

/// Accumulated observations across one document sample, keyed by dotted path.
#[derive(Debug, Clone, Default)]
pub struct FieldObservations {
    paths: BTreeMap<String, PathObservations>,
}

impl FieldObservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation of `field_type` at `path`.
    pub fn record(&mut self, path: &str, field_type: FieldType, value: &Value) {
        let entry = self.paths.entry(path.to_string()).or_default();
        if let Value::String(s) = value {
            entry.strings.push(s.clone());
        }
        entry.types.push(field_type);
    }

    /// Observations for one path
    pub fn get(&self, path: &str) -> Option<&PathObservations> {
        self.paths.get(path)
    }

    /// Iterate paths in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PathObservations)> {
        self.paths.iter()
    }

    /// Number of distinct paths observed
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Walk one document, recording an observation for every reachable path.
///
/// The primary identifier field is skipped at the top level. Array elements
/// are observed at the array's own path, so heterogeneous arrays contribute
/// several observations to a single path. Identifier, date, binary and
/// numeric wrapper shapes are recorded whole, never descended into.
pub fn walk_document(
    document: &Map<String, Value>,
    observations: &mut FieldObservations,
    max_depth: usize,
) {
    for (key, value) in document {
        if key == PRIMARY_ID_FIELD {
            continue;
        }
        walk_value(key, value, observations, max_depth.max(1));
    }
}

fn walk_value(path: &str, value: &Value, observations: &mut FieldObservations, remaining: usize) {
    if remaining == 0 {
        observations.record(path, FieldType::Unknown, value);
        return;
    }
    observations.record(path, infer_bounded(value, remaining), value);
    if shapes::is_opaque_object(value) {
        return;
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if shapes::is_identifier_buffer(key, child) {
                    continue;
                }
                walk_value(&format!("{path}.{key}"), child, observations, remaining - 1);
            }
        }
        Value::Array(items) => {
            for item in items {
                walk_value(path, item, observations, remaining - 1);
            }
        }
        _ => {}
    }
}
