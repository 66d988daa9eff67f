//! Schema extraction strategies
//!
//! A collection schema can come from three places, in priority order:
//! 1. An application-declared schema definition shipped with the deployment
//! 2. Server-side validation rules (`$jsonSchema`)
//! 3. Sampling documents and inferring
//!
//! Each strategy is tried in turn; a strategy whose backing artifact is
//! absent or unusable falls through to the next at debug level, so a missing
//! declaration never fails an analysis that sampling could still serve.

use async_trait::async_trait;
use tracing::debug;

use crate::inference::InferenceConfig;
use crate::models::CollectionSchema;
use crate::source::{DocumentSource, SourceError};

mod declared;
mod sampling;
mod validator;

pub use declared::DeclaredSchemaStrategy;
pub use sampling::SampleDocumentsStrategy;
pub use validator::ValidationRulesStrategy;

/// One way of obtaining a collection schema
#[async_trait]
pub trait SchemaStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Attempt extraction for one collection.
    ///
    /// `Ok(None)` means the backing artifact is absent; an error means it was
    /// unavailable or unusable. Both make the chain fall through to the next
    /// strategy.
    async fn try_extract(
        &self,
        source: &dyn DocumentSource,
        collection: &str,
        total_documents: u64,
    ) -> Result<Option<CollectionSchema>, SourceError>;
}

/// The standard strategy chain in priority order
pub fn default_strategies(config: &InferenceConfig) -> Vec<Box<dyn SchemaStrategy>> {
    vec![
        Box::new(DeclaredSchemaStrategy),
        Box::new(ValidationRulesStrategy),
        Box::new(SampleDocumentsStrategy::new(config.clone())),
    ]
}

/// Run strategies in order, returning the first schema produced.
pub async fn run_strategies(
    strategies: &[Box<dyn SchemaStrategy>],
    source: &dyn DocumentSource,
    collection: &str,
    total_documents: u64,
) -> Option<CollectionSchema> {
    for strategy in strategies {
        match strategy
            .try_extract(source, collection, total_documents)
            .await
        {
            Ok(Some(schema)) => {
                debug!(collection, strategy = strategy.name(), "schema extracted");
                return Some(schema);
            }
            Ok(None) => {
                debug!(
                    collection,
                    strategy = strategy.name(),
                    "no artifact, falling through"
                );
            }
            Err(e) => {
                debug!(
                    collection,
                    strategy = strategy.name(),
                    error = %e,
                    "strategy unavailable, falling through"
                );
            }
        }
    }
    None
}
