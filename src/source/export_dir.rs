//! mongoexport directory source
//!
//! Reads a directory of NDJSON dumps as produced by `mongoexport`: one
//! `<collection>.json` file per collection with one extended-JSON document
//! per line. Two optional sidecar files per collection carry schema
//! artifacts:
//! - `<collection>.schema.json` - application-declared schema definition
//! - `<collection>.validator.json` - server-side validation rules
//!
//! Malformed document lines are skipped with a warning rather than failing
//! the whole collection; an export is routinely truncated or hand-edited.
//!
//! ## Security
//!
//! Collection names are used to build file paths, so names containing path
//! separators or ".." are rejected.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::warn;

use super::{DocumentSource, SourceError};

const SCHEMA_SIDECAR_SUFFIX: &str = ".schema.json";
const VALIDATOR_SIDECAR_SUFFIX: &str = ".validator.json";

/// Document source over a mongoexport dump directory
#[derive(Debug, Clone)]
pub struct ExportDirSource {
    root: PathBuf,
    database: String,
}

impl ExportDirSource {
    /// Open a dump directory. The database name defaults to the directory
    /// name and can be overridden with [`with_database_name`].
    ///
    /// [`with_database_name`]: ExportDirSource::with_database_name
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, SourceError> {
        let root = root.as_ref().to_path_buf();
        let metadata = fs::metadata(&root).await.map_err(|e| {
            SourceError::Unavailable(format!("Cannot open {}: {}", root.display(), e))
        })?;
        if !metadata.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let database = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("export")
            .to_string();
        Ok(Self { root, database })
    }

    /// Override the database name reported by this source
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database = name.into();
        self
    }

    /// Build the path for a collection file, rejecting names that would
    /// escape the dump directory.
    fn collection_path(&self, collection: &str, suffix: &str) -> Result<PathBuf, SourceError> {
        if collection.is_empty()
            || collection.contains("..")
            || collection.contains('/')
            || collection.contains('\\')
        {
            return Err(SourceError::Malformed(format!(
                "Invalid collection name: {collection}"
            )));
        }
        Ok(self.root.join(format!("{collection}{suffix}")))
    }

    async fn read_documents(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, SourceError> {
        let path = self.collection_path(collection, ".json")?;
        let raw = fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::CollectionNotFound(collection.to_string())
            } else {
                SourceError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;

        let mut documents = Vec::new();
        for (index, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(doc @ Value::Object(_)) => documents.push(doc),
                Ok(_) => {
                    warn!(collection, line = index + 1, "skipping non-object line");
                }
                Err(e) => {
                    warn!(collection, line = index + 1, error = %e, "skipping malformed line");
                }
            }
            if let Some(limit) = limit
                && documents.len() >= limit
            {
                break;
            }
        }
        Ok(documents)
    }

    async fn read_sidecar(
        &self,
        collection: &str,
        suffix: &str,
    ) -> Result<Option<Value>, SourceError> {
        let path = self.collection_path(collection, suffix)?;
        match fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                SourceError::Malformed(format!("Invalid sidecar {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SourceError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl DocumentSource for ExportDirSource {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn list_collections(&self) -> Result<Vec<String>, SourceError> {
        let mut read_dir = fs::read_dir(&self.root).await.map_err(|e| {
            SourceError::Io(format!("Failed to read {}: {}", self.root.display(), e))
        })?;

        let mut names = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| SourceError::Io(format!("Failed to read directory entry: {e}")))?
        {
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if file_name.ends_with(SCHEMA_SIDECAR_SUFFIX)
                || file_name.ends_with(VALIDATOR_SIDECAR_SUFFIX)
            {
                continue;
            }
            if let Some(stem) = file_name.strip_suffix(".json") {
                names.push(stem.to_string());
            }
        }
        // Directory order is platform-dependent
        names.sort();
        Ok(names)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, SourceError> {
        let path = self.collection_path(collection, ".json")?;
        let raw = fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::CollectionNotFound(collection.to_string())
            } else {
                SourceError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;
        Ok(raw.lines().filter(|l| !l.trim().is_empty()).count() as u64)
    }

    async fn sample_documents(
        &self,
        collection: &str,
        limit: usize,
    ) -> Result<Vec<Value>, SourceError> {
        self.read_documents(collection, Some(limit)).await
    }

    async fn declared_schema(&self, collection: &str) -> Result<Option<Value>, SourceError> {
        self.read_sidecar(collection, SCHEMA_SIDECAR_SUFFIX).await
    }

    async fn validation_rules(&self, collection: &str) -> Result<Option<Value>, SourceError> {
        self.read_sidecar(collection, VALIDATOR_SIDECAR_SUFFIX).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    async fn dump_with(files: &[(&str, &str)]) -> (TempDir, ExportDirSource) {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(temp.path().join(name), content).await.unwrap();
        }
        let source = ExportDirSource::open(temp.path()).await.unwrap();
        (temp, source)
    }

    #[tokio::test]
    async fn test_lists_collections_without_sidecars() {
        let (_temp, source) = dump_with(&[
            ("users.json", "{}\n"),
            ("orders.json", "{}\n"),
            ("users.schema.json", "{}"),
            ("users.validator.json", "{}"),
            ("notes.txt", "not a dump"),
        ])
        .await;

        let names = source.list_collections().await.unwrap();
        assert_eq!(names, vec!["orders", "users"]);
    }

    #[tokio::test]
    async fn test_samples_documents_up_to_limit() {
        let lines = "{\"n\": 1}\n{\"n\": 2}\n{\"n\": 3}\n";
        let (_temp, source) = dump_with(&[("events.json", lines)]).await;

        let sample = source.sample_documents("events", 2).await.unwrap();
        assert_eq!(sample, vec![json!({"n": 1}), json!({"n": 2})]);
        assert_eq!(source.count_documents("events").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let lines = "{\"ok\": 1}\nnot json at all\n42\n{\"ok\": 2}\n\n";
        let (_temp, source) = dump_with(&[("events.json", lines)]).await;

        let sample = source.sample_documents("events", 10).await.unwrap();
        assert_eq!(sample, vec![json!({"ok": 1}), json!({"ok": 2})]);
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let (_temp, source) = dump_with(&[]).await;
        let result = source.sample_documents("ghost", 5).await;
        assert!(matches!(result, Err(SourceError::CollectionNotFound(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_names_rejected() {
        let (_temp, source) = dump_with(&[]).await;
        for name in ["../etc/passwd", "a/b", "a\\b", ""] {
            let result = source.sample_documents(name, 5).await;
            assert!(matches!(result, Err(SourceError::Malformed(_))), "{name}");
        }
    }

    #[tokio::test]
    async fn test_sidecars_load_when_present() {
        let (_temp, source) = dump_with(&[
            ("users.json", "{}\n"),
            ("users.schema.json", r#"{"email": "String"}"#),
        ])
        .await;

        let declared = source.declared_schema("users").await.unwrap();
        assert_eq!(declared, Some(json!({"email": "String"})));
        assert!(source.validation_rules("users").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_database_name_from_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("shopdb");
        fs::create_dir(&nested).await.unwrap();
        let source = ExportDirSource::open(&nested).await.unwrap();
        assert_eq!(source.database_name(), "shopdb");

        let renamed = source.with_database_name("prod");
        assert_eq!(renamed.database_name(), "prod");
    }

    #[tokio::test]
    async fn test_open_rejects_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = ExportDirSource::open(temp.path().join("absent")).await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}
