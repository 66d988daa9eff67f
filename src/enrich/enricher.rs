//! Field-level enrichment pipeline
//!
//! Sends one prompt per collection schema to a text generation service and
//! attaches the validated records to the schema fields. Records that are
//! malformed or name unknown fields are dropped; a field the service did not
//! answer for keeps an explicit `enrichment: None` gap.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{CollectionSchema, EnrichedCollectionSchema, EnrichedField, FieldEnrichment};

use super::client::TextGenerator;
use super::config::EnrichmentConfig;
use super::error::{EnrichError, EnrichResult};
use super::prompt::{EnrichmentPrompt, estimate_tokens, parse_enrichment_response};

/// Lowest accepted importance score
pub const MIN_IMPORTANCE: u64 = 1;
/// Highest accepted importance score
pub const MAX_IMPORTANCE: u64 = 10;

/// Boundary for attaching semantic metadata to a finalized collection schema.
///
/// Implementations consume the structural schema and return a new enriched
/// representation; the input is never mutated.
#[async_trait]
pub trait CollectionEnricher: Send + Sync {
    async fn enrich(&self, schema: &CollectionSchema) -> EnrichResult<EnrichedCollectionSchema>;
}

/// Enricher backed by a [`TextGenerator`] implementation.
pub struct FieldEnricher<C: TextGenerator> {
    client: C,
    config: EnrichmentConfig,
}

impl<C: TextGenerator> FieldEnricher<C> {
    /// Create a new field enricher
    pub fn new(client: C, config: EnrichmentConfig) -> Self {
        Self { client, config }
    }

    /// Single attempt: complete, parse, validate against the schema
    async fn try_enrich(
        &self,
        prompt: &str,
        schema: &CollectionSchema,
    ) -> EnrichResult<BTreeMap<String, FieldEnrichment>> {
        let response = self.client.complete(prompt).await?;
        let records = parse_enrichment_response(&response)?;
        Ok(validate_records(records, schema))
    }
}

#[async_trait]
impl<C: TextGenerator> CollectionEnricher for FieldEnricher<C> {
    async fn enrich(&self, schema: &CollectionSchema) -> EnrichResult<EnrichedCollectionSchema> {
        if schema.fields.is_empty() {
            return Ok(EnrichedCollectionSchema::unenriched(schema.clone()));
        }

        let prompt = EnrichmentPrompt::for_schema(schema)?
            .with_system_context(self.config.system_context.clone())
            .build();

        let estimated = estimate_tokens(&prompt);
        if estimated > self.config.max_context_tokens {
            return Err(EnrichError::ContextTooLarge {
                max: self.config.max_context_tokens,
                actual: estimated,
            });
        }

        let mut last_error = None;
        let mut retries = 0;

        while retries <= self.config.max_retries {
            match self.try_enrich(&prompt, schema).await {
                Ok(by_field) => {
                    debug!(
                        collection = %schema.collection_name,
                        accepted = by_field.len(),
                        fields = schema.field_count(),
                        "enrichment records accepted"
                    );
                    return Ok(apply_enrichment(schema.clone(), by_field));
                }
                Err(e) => {
                    last_error = Some(e);
                    retries += 1;

                    if retries <= self.config.max_retries {
                        warn!("Enrichment attempt {} failed, retrying...", retries);
                        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or(EnrichError::MaxRetriesExceeded(self.config.max_retries)))
    }
}

/// Match raw records against the schema being enriched.
///
/// A record survives only if it is an object naming an existing schema field
/// with a non-empty meaning and an integer importance within
/// [`MIN_IMPORTANCE`]..=[`MAX_IMPORTANCE`]. Missing tags become an empty
/// list; non-string tags drop the record. When the service repeats a field,
/// the first record wins.
fn validate_records(
    records: Vec<Value>,
    schema: &CollectionSchema,
) -> BTreeMap<String, FieldEnrichment> {
    let mut by_field = BTreeMap::new();

    for record in records {
        let Some(map) = record.as_object() else {
            warn!("Dropping enrichment record: not an object");
            continue;
        };
        let Some(field) = map.get("field").and_then(Value::as_str) else {
            warn!("Dropping enrichment record: no field name");
            continue;
        };
        if !schema.fields.contains_key(field) {
            warn!(field, "Dropping enrichment record: field not in schema");
            continue;
        }
        if by_field.contains_key(field) {
            warn!(field, "Dropping enrichment record: duplicate field");
            continue;
        }

        let meaning = map
            .get("semanticMeaning")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty());
        let Some(meaning) = meaning else {
            warn!(field, "Dropping enrichment record: empty semantic meaning");
            continue;
        };

        let importance = map
            .get("importance")
            .and_then(Value::as_u64)
            .filter(|i| (MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(i));
        let Some(importance) = importance else {
            warn!(field, "Dropping enrichment record: importance out of range");
            continue;
        };

        let tags = match map.get("tags") {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|t| t.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>(),
            Some(_) => None,
        };
        let Some(tags) = tags else {
            warn!(field, "Dropping enrichment record: tags are not strings");
            continue;
        };

        by_field.insert(
            field.to_string(),
            FieldEnrichment {
                semantic_meaning: meaning.to_string(),
                importance: importance as u8,
                tags,
            },
        );
    }

    by_field
}

/// Attach validated records to the schema fields, in field-map order.
fn apply_enrichment(
    schema: CollectionSchema,
    mut by_field: BTreeMap<String, FieldEnrichment>,
) -> EnrichedCollectionSchema {
    let fields = schema
        .fields
        .into_iter()
        .map(|(field, info)| {
            let enrichment = by_field.remove(&field);
            EnrichedField {
                field,
                info,
                enrichment,
            }
        })
        .collect();

    EnrichedCollectionSchema {
        collection_name: schema.collection_name,
        fields,
        total_documents: schema.total_documents,
    }
}
