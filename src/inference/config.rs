//! Configuration for sampling-based inference

use serde::{Deserialize, Serialize};

/// Default number of documents drawn per collection
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Default nesting depth bound for document walking
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for sampling-based inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Maximum number of documents to sample per collection
    pub sample_size: usize,

    /// Maximum nesting depth for document walking; paths below the bound
    /// degrade to unknown instead of failing
    pub max_depth: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the sample size (minimum 1)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size.max(1);
        self
    }

    /// Set the maximum nesting depth (minimum 1)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth.max(1);
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.sample_size, 100);
        assert_eq!(config.max_depth, 64);
    }

    #[test]
    fn test_builder() {
        let config = InferenceConfig::builder()
            .sample_size(20)
            .max_depth(8)
            .build();

        assert_eq!(config.sample_size, 20);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn test_builder_clamps_to_one() {
        let config = InferenceConfig::builder().sample_size(0).max_depth(0).build();

        assert_eq!(config.sample_size, 1);
        assert_eq!(config.max_depth, 1);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: InferenceConfig = serde_json::from_str(r#"{"sampleSize": 25}"#).unwrap();
        assert_eq!(config.sample_size, 25);
        assert_eq!(config.max_depth, 64);
    }
}
