//! Collection and database schema artifacts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldInfo;

/// Structural schema of one collection, finalized by the unifier or mapped
/// from a declared schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSchema {
    pub collection_name: String,
    /// Dotted field path -> finalized field entry
    pub fields: BTreeMap<String, FieldInfo>,
    /// Collection count obtained independently of the sample
    pub total_documents: u64,
}

impl CollectionSchema {
    pub fn new(collection_name: impl Into<String>, total_documents: u64) -> Self {
        Self {
            collection_name: collection_name.into(),
            fields: BTreeMap::new(),
            total_documents,
        }
    }

    /// Number of finalized field paths
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

/// Semantic metadata returned by the enrichment service for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEnrichment {
    pub semantic_meaning: String,
    /// 1 (incidental) to 10 (central to the collection's purpose)
    pub importance: u8,
    pub tags: Vec<String>,
}

/// One field of an enriched collection schema.
///
/// `enrichment: None` is an explicit gap: the service returned no record for
/// this field and nothing is fabricated in its place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedField {
    /// Dotted field path
    pub field: String,
    #[serde(flatten)]
    pub info: FieldInfo,
    #[serde(flatten)]
    pub enrichment: Option<FieldEnrichment>,
}

/// A collection schema after the enrichment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCollectionSchema {
    pub collection_name: String,
    pub fields: Vec<EnrichedField>,
    pub total_documents: u64,
}

impl EnrichedCollectionSchema {
    /// Wrap a structural schema with no enrichment attached to any field,
    /// preserving the field map order.
    pub fn unenriched(schema: CollectionSchema) -> Self {
        let fields = schema
            .fields
            .into_iter()
            .map(|(field, info)| EnrichedField {
                field,
                info,
                enrichment: None,
            })
            .collect();
        Self {
            collection_name: schema.collection_name,
            fields,
            total_documents: schema.total_documents,
        }
    }

    /// How many fields carry enrichment metadata
    pub fn enriched_count(&self) -> usize {
        self.fields.iter().filter(|f| f.enrichment.is_some()).count()
    }
}

/// The persisted analysis artifact: every analyzed collection of one database,
/// in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSchema {
    pub database_name: String,
    pub collections: Vec<EnrichedCollectionSchema>,
    pub analyzed_at: DateTime<Utc>,
}

impl DatabaseSchema {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: database_name.into(),
            collections: Vec::new(),
            analyzed_at: Utc::now(),
        }
    }
}
