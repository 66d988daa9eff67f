//! Error types for field enrichment
//!
//! Covers the failure surface of generated enrichment: connectivity to the
//! text generation service, unusable output after the single repair pass,
//! and configuration problems caught up front.

use thiserror::Error;

/// Errors that can occur during enrichment
#[derive(Error, Debug)]
pub enum EnrichError {
    /// Failed to reach the text generation service
    #[error("Failed to connect to text generation service: {0}")]
    ConnectionError(String),

    /// Request timeout
    #[error("Enrichment request timed out after {0} seconds")]
    Timeout(u64),

    /// Response was parseable but not the expected record shape
    #[error("Invalid enrichment response: {0}")]
    InvalidResponse(String),

    /// Output was not valid JSON, even after the repair pass
    #[error("Failed to parse enrichment output as JSON: {0}")]
    ParseError(String),

    /// Maximum retries exceeded
    #[error("Maximum retries ({0}) exceeded")]
    MaxRetriesExceeded(usize),

    /// Configuration error
    #[error("Enrichment configuration error: {0}")]
    ConfigError(String),

    /// Rate limiting
    #[error("Rate limited by text generation service, retry after {0} seconds")]
    RateLimited(u64),

    /// Prompt does not fit the model context
    #[error("Context exceeds maximum tokens ({max}): {actual} tokens")]
    ContextTooLarge { max: usize, actual: usize },
}

impl From<serde_json::Error> for EnrichError {
    fn from(err: serde_json::Error) -> Self {
        EnrichError::ParseError(err.to_string())
    }
}

/// Result type for enrichment operations
pub type EnrichResult<T> = Result<T, EnrichError>;

impl EnrichError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            EnrichError::ConnectionError(msg) => {
                format!(
                    "Failed to connect to text generation service: {msg}\n\n\
                    Hints:\n\
                    - Verify the service URL in your configuration\n\
                    - For Ollama: ensure 'ollama serve' is running"
                )
            }
            EnrichError::Timeout(secs) => {
                format!(
                    "Enrichment request timed out after {secs} seconds.\n\n\
                    Hints:\n\
                    - The model may be overloaded, try again later\n\
                    - Consider using a smaller/faster model"
                )
            }
            EnrichError::RateLimited(secs) => {
                format!(
                    "Rate limited by text generation service. Retry after {secs} seconds."
                )
            }
            EnrichError::ContextTooLarge { max, actual } => {
                format!(
                    "Collection schema too large for the model context ({actual} tokens, max {max}).\n\n\
                    Hints:\n\
                    - Reduce the inference sample size\n\
                    - Use a model with a larger context window"
                )
            }
            EnrichError::MaxRetriesExceeded(retries) => {
                format!(
                    "Enrichment failed after {retries} retries.\n\n\
                    Hints:\n\
                    - Check your network connection\n\
                    - The service may be experiencing issues, try again later"
                )
            }
            _ => self.to_string(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EnrichError::ConnectionError(_) | EnrichError::Timeout(_) | EnrichError::RateLimited(_)
        )
    }

    /// Get suggested wait time before retry (in seconds)
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            EnrichError::RateLimited(secs) => Some(*secs),
            EnrichError::Timeout(_) => Some(5),
            EnrichError::ConnectionError(_) => Some(2),
            _ => None,
        }
    }
}
