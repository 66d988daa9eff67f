//! In-memory artifact store

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ArtifactStore, StoreError};
use crate::models::DatabaseSchema;

/// In-memory artifact store for tests and embedding callers
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<HashMap<String, DatabaseSchema>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, DatabaseSchema>>, StoreError> {
        self.artifacts
            .lock()
            .map_err(|_| StoreError::Io("artifact store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, key: &str, schema: &DatabaseSchema) -> Result<(), StoreError> {
        self.locked()?.insert(key.to_string(), schema.clone());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<DatabaseSchema>, StoreError> {
        Ok(self.locked()?.get(key).cloned())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.locked()?.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self.locked()?.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryArtifactStore::new();
        let schema = DatabaseSchema::new("shop");

        store.put("shop", &schema).await.unwrap();
        let loaded = store.get("shop").await.unwrap().unwrap();
        assert_eq!(loaded.database_name, "shop");
        assert!(store.exists("shop").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryArtifactStore::new();
        assert!(store.get("absent").await.unwrap().is_none());
        assert!(!store.exists("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryArtifactStore::new();
        store
            .put("shop", &DatabaseSchema::new("shop"))
            .await
            .unwrap();

        store.delete("shop").await.unwrap();
        assert!(!store.exists("shop").await.unwrap());
        assert!(matches!(
            store.delete("shop").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
