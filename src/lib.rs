//! mongolens - Schema discovery and enrichment for MongoDB collections
//!
//! Provides unified interfaces for:
//! - Reading documents, declared schemas, and validation rules from a source
//! - Structural schema inference over bounded document samples
//! - Extraction strategy chaining (declared, validator, sampling)
//! - LLM field enrichment (semantic meaning, importance, tags)
//! - Persisting per-database analysis artifacts

pub mod analyzer;
pub mod enrich;
pub mod extract;
pub mod inference;
pub mod models;
pub mod source;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use analyzer::{AnalysisConfig, AnalyzeError, AnalyzeResult, SchemaAnalyzer};
pub use enrich::{CollectionEnricher, EnrichError, EnrichmentConfig, FieldEnricher, TextGenerator};
#[cfg(feature = "enrich-online")]
pub use enrich::OllamaClient;
pub use extract::{
    DeclaredSchemaStrategy, SampleDocumentsStrategy, SchemaStrategy, ValidationRulesStrategy,
    default_strategies, run_strategies,
};
pub use inference::{InferenceConfig, SchemaUnifier, infer_type, walk_document};
pub use source::{DocumentSource, MemorySource, SourceError};
#[cfg(feature = "native-fs")]
pub use source::ExportDirSource;
pub use store::{ArtifactStore, MemoryArtifactStore, StoreError};
#[cfg(feature = "native-fs")]
pub use store::FileArtifactStore;

// Re-export models
pub use models::{
    CollectionSchema, DatabaseSchema, EnrichedCollectionSchema, EnrichedField, FieldEnrichment,
    FieldInfo, FieldType,
};
