//! Artifact store abstraction
//!
//! Finalized database schemas are kept as named JSON artifacts so later runs,
//! diff tooling, and downstream consumers can read them without re-analyzing.
//! The store is keyed by artifact name, usually the database name.

use async_trait::async_trait;

use crate::models::DatabaseSchema;

/// Error type for artifact store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Artifact not found: {0}")]
    NotFound(String),
    #[error("Invalid artifact key: {0}")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Trait for schema artifact stores
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist a schema under `key`, replacing any previous artifact
    async fn put(&self, key: &str, schema: &DatabaseSchema) -> Result<(), StoreError>;

    /// Load the schema stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<DatabaseSchema>, StoreError>;

    /// Check whether an artifact exists under `key`
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Delete the artifact under `key`
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

pub mod memory;

#[cfg(feature = "native-fs")]
pub mod file;

pub use memory::MemoryArtifactStore;

#[cfg(feature = "native-fs")]
pub use file::FileArtifactStore;
