//! Recognition of BSON-flavored value shapes
//!
//! Sampled documents arrive as JSON (mongoexport relaxed or canonical output,
//! or API-marshalled documents), so BSON-specific values surface either as
//! `$`-keyed extended-JSON wrappers or, for identifiers produced by foreign
//! schema libraries, as objects exposing a raw `buffer` payload. Every shape
//! check lives here so the inferencer, walker and unifier share one predicate
//! per shape instead of growing divergent copies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Byte length of a binary object identifier
pub const OBJECT_ID_LEN: usize = 12;

static OBJECT_ID_HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

const NUMBER_WRAPPERS: [&str; 4] = [
    "$numberInt",
    "$numberLong",
    "$numberDouble",
    "$numberDecimal",
];

/// True for values carrying a 12-byte binary identifier.
///
/// The native form is the extended-JSON wrapper `{"$oid": "<24 hex chars>"}`.
/// The structural fallback covers identifiers serialized by a foreign schema
/// library: an object whose `buffer` property is a 12-element byte sequence.
pub fn is_object_id(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if let Some(Value::String(hex)) = map.get("$oid") {
        return map.len() == 1 && OBJECT_ID_HEX.is_match(hex);
    }
    match map.get("buffer") {
        Some(buffer) => byte_sequence_len(buffer) == Some(OBJECT_ID_LEN),
        None => false,
    }
}

/// True for extended-JSON date wrappers (`{"$date": ...}`), relaxed or
/// canonical payload alike.
pub fn is_date(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.len() == 1 && map.contains_key("$date"))
}

/// True for raw byte-buffer values that are not the identifier shape:
/// extended-JSON `$binary` wrappers (canonical or legacy `$type` pair) and
/// Node-style `{"type": "Buffer", "data": [...]}` serializations.
pub fn is_binary(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    if map.contains_key("$binary") && map.keys().all(|k| k.starts_with('$')) {
        return true;
    }
    matches!(map.get("type"), Some(Value::String(t)) if t == "Buffer")
        && matches!(map.get("data"), Some(Value::Array(_)))
}

/// True for canonical extended-JSON numeric wrappers
/// (`$numberInt`, `$numberLong`, `$numberDouble`, `$numberDecimal`).
pub fn is_number_wrapper(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.len() == 1
        && map.keys().next().is_some_and(|k| NUMBER_WRAPPERS.contains(&k.as_str())))
}

/// Objects that are atomic for schema purposes; their internals are wrapper
/// plumbing, never fields.
pub fn is_opaque_object(value: &Value) -> bool {
    is_object_id(value) || is_date(value) || is_binary(value) || is_number_wrapper(value)
}

/// True when an object property is identifier-internal buffer payload and must
/// be skipped during recursion. A `buffer` key holding ordinary data is kept.
pub fn is_identifier_buffer(key: &str, value: &Value) -> bool {
    key == "buffer" && byte_sequence_len(value).is_some()
}

/// Length of a byte-sequence shape: an array of integers 0-255, or an object
/// indexed `"0"`..`"n-1"` holding such integers. `None` when it is neither.
pub fn byte_sequence_len(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => items.iter().all(is_byte).then_some(items.len()),
        Value::Object(map) => {
            if map.is_empty() {
                return None;
            }
            (0..map.len())
                .all(|i| map.get(i.to_string().as_str()).is_some_and(is_byte))
                .then_some(map.len())
        }
        _ => None,
    }
}

fn is_byte(value: &Value) -> bool {
    value.as_u64().is_some_and(|n| n <= 255)
}
