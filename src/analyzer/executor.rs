//! Analysis executor running the full per-database pass

use std::time::Instant;

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::enrich::CollectionEnricher;
use crate::extract::{default_strategies, run_strategies};
use crate::models::{CollectionSchema, DatabaseSchema, EnrichedCollectionSchema};
use crate::source::DocumentSource;
use crate::store::ArtifactStore;

use super::config::AnalysisConfig;
use super::error::{AnalyzeError, AnalyzeResult};

/// Analyzer that produces one [`DatabaseSchema`] per run.
///
/// Collections are processed one at a time, in configured or discovered
/// order; documents within a sample likewise. This bounds concurrent calls
/// against the document source and the enrichment service to one each.
pub struct SchemaAnalyzer {
    config: AnalysisConfig,
}

impl SchemaAnalyzer {
    /// Create a new analyzer, rejecting invalid configuration up front
    pub fn new(config: AnalysisConfig) -> AnalyzeResult<Self> {
        config.validate().map_err(AnalyzeError::Config)?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Extract the structural schema of one collection.
    ///
    /// Runs the strategy chain: declared schema, then validation rules, then
    /// sampling. The count is taken independently of the sample so
    /// `total_documents` reflects the whole collection.
    pub async fn analyze_collection(
        &self,
        source: &dyn DocumentSource,
        collection: &str,
    ) -> AnalyzeResult<CollectionSchema> {
        let total_documents = source.count_documents(collection).await?;
        let strategies = default_strategies(&self.config.inference);

        match run_strategies(&strategies, source, collection, total_documents).await {
            Some(schema) => Ok(schema),
            None => Err(AnalyzeError::Extraction {
                collection: collection.to_string(),
                detail: "no strategy produced a schema".to_string(),
            }),
        }
    }

    /// Analyze every configured (or discovered) collection of a database.
    ///
    /// Returns the complete artifact or the first error; an enrichment
    /// failure aborts the run rather than returning partial results. When a
    /// store is given, the artifact is persisted under the database name
    /// before returning.
    pub async fn analyze_database(
        &self,
        source: &dyn DocumentSource,
        enricher: Option<&dyn CollectionEnricher>,
        store: Option<&dyn ArtifactStore>,
    ) -> AnalyzeResult<DatabaseSchema> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        let database_name = match &self.config.database {
            Some(name) => name.clone(),
            None => source.database_name().to_string(),
        };

        let collections = if self.config.collections.is_empty() {
            source.list_collections().await?
        } else {
            self.config.collections.clone()
        };

        let enrich = enricher.is_some() && self.config.enrichment.enabled;
        info!(
            run_id = %run_id,
            database = %database_name,
            collections = collections.len(),
            enrichment = enrich,
            "Starting database analysis"
        );

        let mut database = DatabaseSchema::new(&database_name);

        for collection in &collections {
            debug!(run_id = %run_id, collection = %collection, "Analyzing collection");

            let schema = self.analyze_collection(source, collection).await?;
            info!(
                run_id = %run_id,
                collection = %collection,
                fields = schema.field_count(),
                total_documents = schema.total_documents,
                "Collection schema extracted"
            );

            let enriched = match enricher {
                Some(enricher) if self.config.enrichment.enabled => {
                    enricher.enrich(&schema).await.map_err(|e| {
                        error!(
                            run_id = %run_id,
                            collection = %collection,
                            error = %e,
                            "Enrichment failed, aborting run"
                        );
                        AnalyzeError::Enrichment {
                            collection: collection.clone(),
                            source: e,
                        }
                    })?
                }
                _ => EnrichedCollectionSchema::unenriched(schema),
            };

            database.collections.push(enriched);
        }

        if let Some(store) = store {
            store.put(&database_name, &database).await?;
            debug!(run_id = %run_id, key = %database_name, "Analysis artifact persisted");
        }

        info!(
            run_id = %run_id,
            database = %database_name,
            collections = database.collections.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Database analysis complete"
        );

        Ok(database)
    }
}
