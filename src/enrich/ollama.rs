//! Ollama API client for enrichment
//!
//! HTTP client for a locally hosted Ollama server, used as the text
//! generation service behind [`FieldEnricher`](super::FieldEnricher).
//!
//! # Example
//!
//! ```ignore
//! use mongolens::enrich::OllamaClient;
//!
//! let client = OllamaClient::new("http://localhost:11434", "llama3.2")
//!     .with_timeout(60);
//!
//! let response = client.complete("Describe these fields...").await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::TextGenerator;
use super::config::EnrichmentConfig;
use super::error::{EnrichError, EnrichResult};

/// Ollama API client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    /// Base URL of the Ollama API
    base_url: String,
    /// Model name to use
    model: String,
    /// Request timeout in seconds
    timeout_seconds: u64,
    /// Maximum context tokens
    max_context_tokens: usize,
    /// Temperature for sampling
    temperature: f32,
    /// HTTP client
    client: reqwest::Client,
}

/// Request body for the Ollama generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

/// Options for generation
#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: usize,
}

/// Response from the Ollama generate endpoint
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

/// Response from the Ollama tags endpoint (list models)
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

/// Model information from Ollama
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct ModelInfo {
    name: String,
    #[serde(default)]
    size: u64,
}

impl OllamaClient {
    /// Create a new Ollama client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the Ollama API (e.g., "http://localhost:11434")
    /// * `model` - Model name to use (e.g., "llama3.2", "mistral", "codellama")
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout_seconds: 120,
            max_context_tokens: 4096,
            temperature: 0.1,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client wired from an enrichment configuration
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self::new(&config.base_url, &config.model)
            .with_timeout(config.timeout_seconds)
            .with_max_context(config.max_context_tokens)
            .with_temperature(config.temperature)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Set the maximum context tokens
    pub fn with_max_context(mut self, tokens: usize) -> Self {
        self.max_context_tokens = tokens;
        self
    }

    /// Set the temperature for sampling
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List available models on the Ollama server
    pub async fn list_models(&self) -> EnrichResult<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| EnrichError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EnrichError::ConnectionError(format!(
                "Failed to list models: HTTP {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| EnrichError::ParseError(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check if the configured model is available
    pub async fn model_available(&self) -> EnrichResult<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.starts_with(&self.model)))
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    async fn complete(&self, prompt: &str) -> EnrichResult<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: Some(GenerateOptions {
                temperature: self.temperature,
                num_ctx: self.max_context_tokens,
            }),
        };

        tracing::debug!("Sending request to Ollama: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EnrichError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    EnrichError::ConnectionError(format!(
                        "Failed to connect to Ollama at {}: {}",
                        self.base_url, e
                    ))
                } else {
                    EnrichError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(EnrichError::RateLimited(60));
            }
            return Err(EnrichError::ConnectionError(format!(
                "Ollama API error (HTTP {}): {}",
                status, error_text
            )));
        }

        let gen_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EnrichError::ParseError(e.to_string()))?;

        if let Some(duration) = gen_response.total_duration {
            tracing::debug!(
                "Ollama completion took {} ms, {} prompt tokens, {} completion tokens",
                duration / 1_000_000,
                gen_response.prompt_eval_count.unwrap_or(0),
                gen_response.eval_count.unwrap_or(0)
            );
        }

        Ok(gen_response.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn max_tokens(&self) -> usize {
        self.max_context_tokens
    }

    async fn is_ready(&self) -> bool {
        self.list_models().await.is_ok()
    }
}
