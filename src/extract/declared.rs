//! Application-declared schema extraction
//!
//! Parses schema definitions in the style of Node ODM libraries: a JSON
//! object mapping field names to a type-name string, an options object
//! carrying `type` plus modifiers (`required`, `enum`, `of`, `ref`), an
//! array shorthand wrapping an element definition, or a nested plain object
//! of further definitions.
//!
//! Declared enums are taken verbatim; the cardinality rules only govern
//! values observed through sampling.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::SchemaStrategy;
use crate::models::{CollectionSchema, FieldInfo, FieldType, PRIMARY_ID_FIELD};
use crate::source::{DocumentSource, SourceError};

/// Extracts schemas from application-declared definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredSchemaStrategy;

#[async_trait]
impl SchemaStrategy for DeclaredSchemaStrategy {
    fn name(&self) -> &'static str {
        "declared-schema"
    }

    async fn try_extract(
        &self,
        source: &dyn DocumentSource,
        collection: &str,
        total_documents: u64,
    ) -> Result<Option<CollectionSchema>, SourceError> {
        let Some(definition) = source.declared_schema(collection).await? else {
            return Ok(None);
        };
        let Value::Object(map) = definition else {
            return Err(SourceError::Malformed(format!(
                "Declared schema for {collection} is not an object"
            )));
        };

        let mut schema = CollectionSchema::new(collection, total_documents);
        for (name, def) in &map {
            if name == PRIMARY_ID_FIELD {
                continue;
            }
            collect_field(name, def, &mut schema.fields);
        }
        Ok(Some(schema))
    }
}

/// Insert the entry for `path`, then flatten nested definitions below it into
/// dotted paths the way sampling does.
fn collect_field(path: &str, def: &Value, fields: &mut BTreeMap<String, FieldInfo>) {
    fields.insert(path.to_string(), parse_definition(def));
    match def {
        Value::Object(map) if !is_options_form(map) => {
            for (name, child) in map {
                collect_field(&format!("{path}.{name}"), child, fields);
            }
        }
        Value::Array(items) => {
            if let Some(Value::Object(element)) = items.first()
                && !is_options_form(element)
            {
                for (name, child) in element {
                    collect_field(&format!("{path}.{name}"), child, fields);
                }
            }
        }
        _ => {}
    }
}

fn parse_definition(def: &Value) -> FieldInfo {
    match def {
        Value::String(name) => FieldInfo::new(type_from_name(name)),
        Value::Array(items) => FieldInfo::new(array_definition(items)),
        Value::Object(map) if is_options_form(map) => parse_options(map),
        Value::Object(map) => {
            let mut properties = BTreeMap::new();
            for (name, child) in map {
                properties.insert(name.clone(), parse_definition(child));
            }
            FieldInfo::new(FieldType::object(properties))
        }
        _ => FieldInfo::new(FieldType::Unknown),
    }
}

/// An object definition is the options form when its `type` key holds a type
/// descriptor; otherwise `type` is an ordinary nested field name.
fn is_options_form(map: &Map<String, Value>) -> bool {
    matches!(map.get("type"), Some(Value::String(_) | Value::Array(_)))
}

fn parse_options(map: &Map<String, Value>) -> FieldInfo {
    let field_type = match map.get("type") {
        Some(Value::String(name)) if name == "Map" => map_of(map),
        Some(Value::String(name)) => type_from_name(name),
        Some(Value::Array(items)) => array_definition(items),
        _ => FieldType::Unknown,
    };
    let field_type = if matches!(field_type, FieldType::String)
        && let Some(values) = enum_values(map)
    {
        FieldType::Enum { values }
    } else {
        field_type
    };
    FieldInfo {
        field_type,
        required: required_flag(map),
    }
}

fn array_definition(items: &[Value]) -> FieldType {
    match items.first() {
        Some(element) => FieldType::array(parse_definition(element).field_type),
        None => FieldType::array(FieldType::Unknown),
    }
}

fn map_of(map: &Map<String, Value>) -> FieldType {
    FieldType::Object {
        properties: BTreeMap::new(),
        additional_properties: map.get("of").map(|of| Box::new(parse_definition(of))),
    }
}

fn type_from_name(name: &str) -> FieldType {
    match name.trim() {
        "String" => FieldType::String,
        "Number" | "Decimal128" | "BigInt" => FieldType::Number,
        "Boolean" => FieldType::Boolean,
        "Date" => FieldType::Date,
        "Buffer" => FieldType::Binary,
        "ObjectId" | "ObjectID" | "Schema.Types.ObjectId" | "mongoose.Schema.Types.ObjectId" => {
            FieldType::ObjectId
        }
        "Map" => FieldType::Object {
            properties: BTreeMap::new(),
            additional_properties: None,
        },
        "Mixed" | "Schema.Types.Mixed" | "mongoose.Schema.Types.Mixed" => FieldType::Unknown,
        _ => FieldType::Unknown,
    }
}

fn required_flag(map: &Map<String, Value>) -> bool {
    match map.get("required") {
        Some(Value::Bool(flag)) => *flag,
        // Tuple form carries a custom message after the flag
        Some(Value::Array(items)) => items.first().and_then(Value::as_bool).unwrap_or(false),
        _ => false,
    }
}

fn enum_values(map: &Map<String, Value>) -> Option<Vec<String>> {
    let Some(Value::Array(items)) = map.get("enum") else {
        return None;
    };
    let values: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    (!values.is_empty() && values.len() == items.len()).then_some(values)
}
