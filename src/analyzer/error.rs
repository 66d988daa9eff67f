//! Error types for analysis runs
//!
//! Errors carry the stage and collection they arose in, so a failed
//! multi-collection run reports exactly where it stopped.

use thiserror::Error;

use crate::enrich::EnrichError;
use crate::source::SourceError;
use crate::store::StoreError;

/// Errors that can occur during a database analysis run
#[derive(Error, Debug)]
pub enum AnalyzeError {
    /// Analysis configuration error, raised before any collection is touched
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document source failure outside the strategy chain
    #[error("Document source error: {0}")]
    Source(#[from] SourceError),

    /// Every extraction strategy declined the collection
    #[error("Extraction failed for collection '{collection}': {detail}")]
    Extraction { collection: String, detail: String },

    /// The enrichment collaborator failed; the run is aborted
    #[error("Enrichment failed for collection '{collection}': {source}")]
    Enrichment {
        collection: String,
        #[source]
        source: EnrichError,
    },

    /// Persisting the analysis artifact failed
    #[error("Artifact store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for analysis operations
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

impl AnalyzeError {
    /// The collection the error is scoped to, when it is scoped to one
    pub fn collection(&self) -> Option<&str> {
        match self {
            AnalyzeError::Extraction { collection, .. }
            | AnalyzeError::Enrichment { collection, .. } => Some(collection),
            _ => None,
        }
    }
}
