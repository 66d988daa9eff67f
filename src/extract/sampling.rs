//! Sampling-based schema extraction
//!
//! The strategy of last resort and the only one that always applies: draw up
//! to the configured number of documents, walk them into per-path
//! observations, and unify.

use async_trait::async_trait;
use tracing::debug;

use super::SchemaStrategy;
use crate::inference::{FieldObservations, InferenceConfig, SchemaUnifier, walk_document};
use crate::models::CollectionSchema;
use crate::source::{DocumentSource, SourceError};

/// Extracts schemas by sampling documents and inferring types
#[derive(Debug, Clone)]
pub struct SampleDocumentsStrategy {
    config: InferenceConfig,
}

impl SampleDocumentsStrategy {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SchemaStrategy for SampleDocumentsStrategy {
    fn name(&self) -> &'static str {
        "sample-documents"
    }

    async fn try_extract(
        &self,
        source: &dyn DocumentSource,
        collection: &str,
        total_documents: u64,
    ) -> Result<Option<CollectionSchema>, SourceError> {
        let sample = source
            .sample_documents(collection, self.config.sample_size)
            .await?;

        // An existing but empty collection yields an empty schema, not an
        // error
        let mut observations = FieldObservations::new();
        for doc in &sample {
            if let Some(map) = doc.as_object() {
                walk_document(map, &mut observations, self.config.max_depth);
            }
        }
        debug!(
            collection,
            sampled = sample.len(),
            paths = observations.len(),
            "walked sampled documents"
        );

        let schema = SchemaUnifier::new(self.config.clone()).unify(
            &observations,
            &sample,
            collection,
            total_documents,
        );
        Ok(Some(schema))
    }
}
