//! Structural type inference for single values

use std::collections::BTreeMap;

use serde_json::Value;

use super::config::DEFAULT_MAX_DEPTH;
use super::{enums, shapes};
use crate::models::{FieldInfo, FieldType};

/// Infer the structural type of one value.
///
/// Pure and recursive. Identifier shapes are checked before generic object
/// and array handling so identifier internals are never read as nested
/// fields, and all-string arrays are offered to enum detection before the
/// first-element fallback.
pub fn infer_type(value: &Value) -> FieldType {
    infer_bounded(value, DEFAULT_MAX_DEPTH)
}

/// Inference with an explicit depth bound. Values past the bound degrade to
/// [`FieldType::Unknown`].
pub fn infer_bounded(value: &Value, remaining: usize) -> FieldType {
    if remaining == 0 {
        return FieldType::Unknown;
    }
    match value {
        Value::Null => FieldType::Null,
        v if shapes::is_object_id(v) => FieldType::ObjectId,
        Value::Array(items) => infer_array(items, remaining),
        v if shapes::is_date(v) => FieldType::Date,
        v if shapes::is_binary(v) => FieldType::Binary,
        v if shapes::is_number_wrapper(v) => FieldType::Number,
        Value::Object(map) => {
            let mut properties = BTreeMap::new();
            for (key, child) in map {
                if shapes::is_identifier_buffer(key, child) {
                    continue;
                }
                let info = FieldInfo::new(infer_bounded(child, remaining - 1));
                properties.insert(key.clone(), info);
            }
            FieldType::object(properties)
        }
        Value::String(_) => FieldType::String,
        Value::Number(_) => FieldType::Number,
        Value::Bool(_) => FieldType::Boolean,
    }
}

fn infer_array(items: &[Value], remaining: usize) -> FieldType {
    if items.is_empty() {
        return FieldType::array(FieldType::Unknown);
    }
    if items.iter().all(Value::is_string) {
        let strings = items.iter().filter_map(Value::as_str);
        if let Some(values) = enums::classify(strings) {
            return FieldType::Enum { values };
        }
        return FieldType::array(FieldType::String);
    }
    FieldType::array(infer_bounded(&items[0], remaining - 1))
}
