//! LLM field enrichment
//!
//! This module attaches semantic metadata to finalized collection schemas:
//! each field gets a short meaning, an importance score from 1 to 10, and
//! classification tags, produced by a text generation service.
//!
//! # Features
//!
//! - **Online Mode**: Connect to an Ollama API for generation (requires the
//!   `enrich-online` feature)
//! - **Deployment Context**: An optional free-text system description is
//!   prepended to every prompt
//! - **Repair**: Near-JSON output is repaired once (quote bare keys, strip
//!   trailing commas) before giving up
//! - **Validation**: Records are matched against the schema by exact field
//!   name; unanswered fields keep an explicit gap
//!
//! # Example
//!
//! ```ignore
//! use mongolens::enrich::{
//!     CollectionEnricher, EnrichmentConfig, FieldEnricher, OllamaClient,
//! };
//!
//! let config = EnrichmentConfig::with_ollama("llama3.2")
//!     .with_system_context("Order management for a web shop")
//!     .with_timeout(60);
//!
//! let client = OllamaClient::from_config(&config);
//! let enricher = FieldEnricher::new(client, config);
//!
//! let enriched = enricher.enrich(&schema).await?;
//! println!("{} of {} fields annotated", enriched.enriched_count(), enriched.fields.len());
//! ```

pub mod client;
pub mod config;
pub mod enricher;
pub mod error;
#[cfg(feature = "enrich-online")]
pub mod ollama;
pub mod prompt;
mod repair;

// Re-export main types
pub use client::TextGenerator;
pub use config::EnrichmentConfig;
pub use enricher::{CollectionEnricher, FieldEnricher, MAX_IMPORTANCE, MIN_IMPORTANCE};
pub use error::{EnrichError, EnrichResult};
#[cfg(feature = "enrich-online")]
pub use ollama::OllamaClient;
pub use prompt::{EnrichmentPrompt, estimate_tokens, parse_enrichment_response};

#[cfg(test)]
pub use client::{MockTextGenerator, ScriptedAnswer};
