//! Schema data model
//!
//! Types shared by inference, extraction, enrichment and persistence:
//! - [`FieldType`] / [`FieldInfo`] - the recursive structural type of one field path
//! - [`CollectionSchema`] - finalized per-collection field map
//! - [`EnrichedCollectionSchema`] / [`DatabaseSchema`] - enrichment output and
//!   the persisted analysis artifact

mod collection;
mod field;

pub use collection::{
    CollectionSchema, DatabaseSchema, EnrichedCollectionSchema, EnrichedField, FieldEnrichment,
};
pub use field::{FieldInfo, FieldType, PRIMARY_ID_FIELD};
