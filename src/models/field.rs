//! Field-level schema types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The primary identifier key of a document, excluded from field walks and
/// declared-schema extraction.
pub const PRIMARY_ID_FIELD: &str = "_id";

/// Structural type of one field path.
///
/// Container payloads live on their variant, so a value carries exactly the
/// attributes its type allows: `items` for arrays, `properties` (and, for
/// declared map fields, `additionalProperties`) for objects, `values` for
/// enums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// Null or absent value
    Null,
    /// Freeform string
    String,
    /// Integer or floating point number
    Number,
    /// Boolean
    Boolean,
    /// Date value
    Date,
    /// Raw byte buffer
    Binary,
    /// 12-byte binary identifier
    #[serde(rename = "ObjectId")]
    ObjectId,
    /// Array with a sampled element type
    Array { items: Box<FieldType> },
    /// Nested document
    Object {
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        properties: BTreeMap<String, FieldInfo>,
        /// Value type for map fields with dynamic keys (declared schemas only)
        #[serde(
            default,
            rename = "additionalProperties",
            skip_serializing_if = "Option::is_none"
        )]
        additional_properties: Option<Box<FieldInfo>>,
    },
    /// Bounded set of repeating string values
    Enum { values: Vec<String> },
    /// Unrecognized or unobserved shape
    Unknown,
}

impl FieldType {
    /// Get the serialized type name
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Null => "null",
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Binary => "binary",
            FieldType::ObjectId => "ObjectId",
            FieldType::Array { .. } => "array",
            FieldType::Object { .. } => "object",
            FieldType::Enum { .. } => "enum",
            FieldType::Unknown => "unknown",
        }
    }

    /// Build an object type from its properties
    pub fn object(properties: BTreeMap<String, FieldInfo>) -> Self {
        FieldType::Object {
            properties,
            additional_properties: None,
        }
    }

    /// Build an array type around an element type
    pub fn array(items: FieldType) -> Self {
        FieldType::Array {
            items: Box::new(items),
        }
    }
}

/// A finalized field entry: structural type plus per-sample presence.
///
/// `required` is meaningful at the attachment points where a field map is
/// finalized (the dotted-path entries of a collection schema and declared
/// property definitions); array element descriptors stay bare [`FieldType`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    #[serde(flatten)]
    pub field_type: FieldType,
    /// True iff the field resolved to a non-null value in every sampled document
    pub required: bool,
}

impl FieldInfo {
    /// Create a field entry; presence across the sample is not yet known
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
        }
    }

    /// Set the required flag
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}
