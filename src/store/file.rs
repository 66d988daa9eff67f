//! File-backed artifact store
//!
//! Persists each schema as a pretty-printed `<key>.json` under a base
//! directory.
//!
//! ## Security
//!
//! Artifact keys become file names, so keys are restricted to a safe
//! character set and may not contain "..".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{ArtifactStore, StoreError};
use crate::models::DatabaseSchema;

/// File-backed artifact store
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    base_path: PathBuf,
}

impl FileArtifactStore {
    /// Create a store rooted at `base_path`. The directory is created on the
    /// first write.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn artifact_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.contains("..")
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn put(&self, key: &str, schema: &DatabaseSchema) -> Result<(), StoreError> {
        let path = self.artifact_path(key)?;
        let json = serde_json::to_vec_pretty(schema)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StoreError::Io(format!(
                "Failed to create {}: {}",
                self.base_path.display(),
                e
            ))
        })?;
        fs::write(&path, json)
            .await
            .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    async fn get(&self, key: &str) -> Result<Option<DatabaseSchema>, StoreError> {
        let path = self.artifact_path(key)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| StoreError::Serialization(format!("Invalid artifact {key}: {e}")))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.artifact_path(key)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::Io(format!(
                "Failed to check {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.artifact_path(key)?;
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(key.to_string())
            } else {
                StoreError::Io(format!("Failed to delete {}: {}", path.display(), e))
            }
        })
    }
}
