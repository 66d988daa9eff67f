//! Validation-rule schema extraction
//!
//! Maps server-side `$jsonSchema` validation rules onto the collection
//! schema model. Accepts either the validator document (`{"$jsonSchema":
//! {...}}`) or the bare JSON-schema object, since deployments export both
//! forms.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::SchemaStrategy;
use crate::models::{CollectionSchema, FieldInfo, FieldType, PRIMARY_ID_FIELD};
use crate::source::{DocumentSource, SourceError};

/// Extracts schemas from server-side validation rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationRulesStrategy;

#[async_trait]
impl SchemaStrategy for ValidationRulesStrategy {
    fn name(&self) -> &'static str {
        "validation-rules"
    }

    async fn try_extract(
        &self,
        source: &dyn DocumentSource,
        collection: &str,
        total_documents: u64,
    ) -> Result<Option<CollectionSchema>, SourceError> {
        let Some(rules) = source.validation_rules(collection).await? else {
            return Ok(None);
        };
        let Some(json_schema) = unwrap_json_schema(&rules) else {
            return Err(SourceError::Malformed(format!(
                "Validation rules for {collection} carry no usable $jsonSchema"
            )));
        };

        let mut schema = CollectionSchema::new(collection, total_documents);
        collect_properties(json_schema, "", &mut schema.fields);
        Ok(Some(schema))
    }
}

/// Find the JSON-schema object inside whatever wrapper the rules arrived in.
fn unwrap_json_schema(rules: &Value) -> Option<&Map<String, Value>> {
    let map = rules.as_object()?;
    if let Some(inner) = map.get("$jsonSchema") {
        return inner.as_object();
    }
    if let Some(validator) = map.get("validator") {
        return unwrap_json_schema(validator);
    }
    (map.contains_key("properties") || map.contains_key("bsonType")).then_some(map)
}

/// Flatten one schema level's properties into dotted-path entries, honoring
/// the level's `required` name list.
fn collect_properties(level: &Map<String, Value>, prefix: &str, fields: &mut BTreeMap<String, FieldInfo>) {
    let required = required_names(level);
    let Some(Value::Object(properties)) = level.get("properties") else {
        return;
    };
    for (name, property) in properties {
        if prefix.is_empty() && name == PRIMARY_ID_FIELD {
            continue;
        }
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        let field_type = parse_property(property);
        fields.insert(
            path.clone(),
            FieldInfo {
                field_type,
                required: required.contains(&name.as_str()),
            },
        );
        flatten_children(property, &path, fields);
    }
}

fn flatten_children(property: &Value, path: &str, fields: &mut BTreeMap<String, FieldInfo>) {
    let Some(map) = property.as_object() else {
        return;
    };
    if map.contains_key("properties") {
        collect_properties(map, path, fields);
    } else if let Some(items) = map.get("items").and_then(Value::as_object)
        && items.contains_key("properties")
    {
        // Array-of-object items contribute subfield paths, like sampling
        collect_properties(items, path, fields);
    }
}

fn required_names(level: &Map<String, Value>) -> Vec<&str> {
    level
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn parse_property(property: &Value) -> FieldType {
    let Some(map) = property.as_object() else {
        return FieldType::Unknown;
    };
    if let Some(values) = enum_values(map) {
        return FieldType::Enum { values };
    }
    match type_name(map) {
        Some("objectId") => FieldType::ObjectId,
        Some("string") => FieldType::String,
        Some("int" | "long" | "double" | "decimal" | "number") => FieldType::Number,
        Some("bool" | "boolean") => FieldType::Boolean,
        Some("date" | "timestamp") => FieldType::Date,
        Some("binData") => FieldType::Binary,
        Some("null") => FieldType::Null,
        Some("object") => parse_object(map),
        Some("array") => {
            let items = map
                .get("items")
                .map(parse_property)
                .unwrap_or(FieldType::Unknown);
            FieldType::array(items)
        }
        _ => FieldType::Unknown,
    }
}

/// The declared type: `bsonType` preferred, JSON-schema `type` accepted.
/// Nullable unions (`["string", "null"]`) resolve to the first non-null name.
fn type_name(map: &Map<String, Value>) -> Option<&str> {
    let declared = map.get("bsonType").or_else(|| map.get("type"))?;
    match declared {
        Value::String(name) => Some(name.as_str()),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .find(|name| *name != "null"),
        _ => None,
    }
}

fn parse_object(map: &Map<String, Value>) -> FieldType {
    let mut properties = BTreeMap::new();
    if let Some(Value::Object(props)) = map.get("properties") {
        let required = required_names(map);
        for (name, property) in props {
            properties.insert(
                name.clone(),
                FieldInfo {
                    field_type: parse_property(property),
                    required: required.contains(&name.as_str()),
                },
            );
        }
    }
    FieldType::Object {
        properties,
        additional_properties: map
            .get("additionalProperties")
            .filter(|v| v.is_object())
            .map(|v| Box::new(FieldInfo::new(parse_property(v)))),
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
