//! In-memory document source
//!
//! Holds fixture collections for tests and for embedding callers that already
//! have their documents in hand. Collections keep insertion order so
//! discovery-driven analysis is deterministic.

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentSource, SourceError};

/// In-memory document source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    database: String,
    collections: Vec<MemoryCollection>,
}

#[derive(Debug, Clone, Default)]
struct MemoryCollection {
    name: String,
    documents: Vec<Value>,
    declared_schema: Option<Value>,
    validation_rules: Option<Value>,
    total_documents: Option<u64>,
}

impl MemorySource {
    /// Create an empty source for the given database name
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: Vec::new(),
        }
    }

    /// Add a collection with its documents
    pub fn with_collection(mut self, name: impl Into<String>, documents: Vec<Value>) -> Self {
        let collection = self.collection_mut(&name.into());
        collection.documents = documents;
        self
    }

    /// Attach an application-declared schema definition to a collection
    pub fn with_declared_schema(mut self, name: &str, definition: Value) -> Self {
        self.collection_mut(name).declared_schema = Some(definition);
        self
    }

    /// Attach server-side validation rules to a collection
    pub fn with_validation_rules(mut self, name: &str, rules: Value) -> Self {
        self.collection_mut(name).validation_rules = Some(rules);
        self
    }

    /// Override the reported total document count for a collection
    pub fn with_total_documents(mut self, name: &str, total: u64) -> Self {
        self.collection_mut(name).total_documents = Some(total);
        self
    }

    fn collection(&self, name: &str) -> Result<&MemoryCollection, SourceError> {
        self.collections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SourceError::CollectionNotFound(name.to_string()))
    }

    fn collection_mut(&mut self, name: &str) -> &mut MemoryCollection {
        if let Some(index) = self.collections.iter().position(|c| c.name == name) {
            return &mut self.collections[index];
        }
        self.collections.push(MemoryCollection {
            name: name.to_string(),
            ..MemoryCollection::default()
        });
        self.collections.last_mut().expect("collection just pushed")
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn list_collections(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.collections.iter().map(|c| c.name.clone()).collect())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, SourceError> {
        let collection = self.collection(collection)?;
        Ok(collection
            .total_documents
            .unwrap_or(collection.documents.len() as u64))
    }

    async fn sample_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, SourceError> {
        let collection = self.collection(collection)?;
        Ok(collection.documents.iter().take(limit).cloned().collect())
    }

    async fn declared_schema(&self, collection: &str) -> Result<Option<Value>, SourceError> {
        Ok(self.collection(collection)?.declared_schema.clone())
    }

    async fn validation_rules(&self, collection: &str) -> Result<Option<Value>, SourceError> {
        Ok(self.collection(collection)?.validation_rules.clone())
    }
}
