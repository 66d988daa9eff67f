//! Configuration for field enrichment

use serde::{Deserialize, Serialize};

use super::error::{EnrichError, EnrichResult};

/// Configuration for enrichment through a text generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentConfig {
    /// Whether enrichment runs at all
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the generation service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Free-text description of the deployment, included in prompts
    #[serde(default)]
    pub system_context: Option<String>,

    /// Temperature for sampling (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum context tokens for a prompt
    #[serde(default = "default_max_context_tokens")]
    pub max_context_tokens: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum retries on failure
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_context_tokens() -> usize {
    4096
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_max_retries() -> usize {
    2
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_model(),
            system_context: None,
            temperature: default_temperature(),
            max_context_tokens: default_max_context_tokens(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
        }
    }
}

impl EnrichmentConfig {
    /// Create an enabled configuration for an Ollama-compatible service
    pub fn with_ollama(model: impl Into<String>) -> Self {
        Self {
            enabled: true,
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set the service base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the deployment context included in prompts
    pub fn with_system_context(mut self, context: impl Into<String>) -> Self {
        self.system_context = Some(context.into());
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the maximum context tokens
    pub fn with_max_context_tokens(mut self, tokens: usize) -> Self {
        self.max_context_tokens = tokens;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the maximum retries
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Check the configuration before any work starts.
    ///
    /// A disabled configuration is always valid.
    pub fn validate(&self) -> EnrichResult<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.model.trim().is_empty() {
            return Err(EnrichError::ConfigError("model name is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(EnrichError::ConfigError(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.max_context_tokens < 256 {
            return Err(EnrichError::ConfigError(format!(
                "max context of {} tokens leaves no room for a prompt",
                self.max_context_tokens
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnrichmentConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.max_retries, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = EnrichmentConfig::with_ollama("mistral")
            .with_base_url("http://remote:11434")
            .with_system_context("E-commerce platform")
            .with_temperature(5.0)
            .with_timeout(60)
            .with_max_retries(4);

        assert!(config.enabled);
        assert_eq!(config.model, "mistral");
        assert_eq!(config.base_url, "http://remote:11434");
        assert!((config.temperature - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.timeout_seconds, 60);
        assert_eq!(config.max_retries, 4);
    }

    #[test]
    fn test_validate_rejects_bad_enabled_config() {
        let config = EnrichmentConfig::with_ollama("");
        assert!(matches!(
            config.validate(),
            Err(EnrichError::ConfigError(_))
        ));

        let config = EnrichmentConfig::with_ollama("llama3.2").with_base_url("localhost:11434");
        assert!(matches!(
            config.validate(),
            Err(EnrichError::ConfigError(_))
        ));

        let config = EnrichmentConfig::with_ollama("llama3.2").with_max_context_tokens(10);
        assert!(matches!(
            config.validate(),
            Err(EnrichError::ConfigError(_))
        ));
    }

    #[test]
    fn test_disabled_config_is_never_rejected() {
        let config = EnrichmentConfig {
            enabled: false,
            model: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EnrichmentConfig =
            serde_json::from_str(r#"{"enabled": true, "model": "qwen2.5"}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.model, "qwen2.5");
        assert_eq!(config.timeout_seconds, 120);
    }
}
