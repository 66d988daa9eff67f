//! Document source abstraction
//!
//! Defines the DocumentSource trait and implementations for different
//! deployment shapes:
//! - MemorySource: in-memory fixtures (tests, embedding)
//! - ExportDirSource: mongoexport NDJSON dump directories (native)
//!
//! A source exposes the raw material analysis needs per collection: sampled
//! documents, the total document count, and the optional schema artifacts
//! (application-declared definitions and server-side validation rules) that
//! the extraction chain prefers over sampling.

use async_trait::async_trait;
use serde_json::Value;

/// Error type for document source operations
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    #[error("Source unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Malformed source data: {0}")]
    Malformed(String),
}

/// Trait for document sources
///
/// Collections are addressed by name. Methods surface errors rather than
/// panicking so the extraction chain can fall through to the next strategy
/// when a particular artifact is unavailable.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Name of the database this source draws from
    fn database_name(&self) -> &str;

    /// List collection names in source order
    async fn list_collections(&self) -> Result<Vec<String>, SourceError>;

    /// Total number of documents in a collection
    async fn count_documents(&self, collection: &str) -> Result<u64, SourceError>;

    /// Draw up to `limit` documents from a collection
    async fn sample_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, SourceError>;

    /// Application-declared schema definition for a collection, when the
    /// deployment ships one
    async fn declared_schema(&self, collection: &str) -> Result<Option<Value>, SourceError>;

    /// Server-side validation rules for a collection, when configured
    async fn validation_rules(&self, collection: &str) -> Result<Option<Value>, SourceError>;
}

pub mod memory;

#[cfg(feature = "native-fs")]
pub mod export_dir;

pub use memory::MemorySource;

#[cfg(feature = "native-fs")]
pub use export_dir::ExportDirSource;
