//! Analysis run configuration

use serde::{Deserialize, Serialize};

use crate::enrich::EnrichmentConfig;
use crate::inference::InferenceConfig;

/// Configuration for a database analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    /// Artifact key override; the source's database name is used when absent
    pub database: Option<String>,
    /// Collections to analyze, in order (empty = discover from the source)
    pub collections: Vec<String>,
    /// Structural inference settings
    pub inference: InferenceConfig,
    /// Field enrichment settings
    pub enrichment: EnrichmentConfig,
}

impl AnalysisConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the database name used as the artifact key
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Set the collections to analyze
    pub fn with_collections(mut self, collections: Vec<String>) -> Self {
        self.collections = collections;
        self
    }

    /// Set the inference settings
    pub fn with_inference(mut self, inference: InferenceConfig) -> Self {
        self.inference = inference;
        self
    }

    /// Set the enrichment settings
    pub fn with_enrichment(mut self, enrichment: EnrichmentConfig) -> Self {
        self.enrichment = enrichment;
        self
    }

    /// Parse a configuration from TOML text
    #[cfg(feature = "cli")]
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Validate the configuration.
    ///
    /// Runs before any collection is touched; an invalid config never starts
    /// a partial analysis.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(database) = &self.database
            && database.trim().is_empty()
        {
            return Err("Database name must not be blank".to_string());
        }

        if self.collections.iter().any(|c| c.trim().is_empty()) {
            return Err("Collection names must not be blank".to_string());
        }

        self.enrichment.validate().map_err(|e| e.to_string())
    }
}
