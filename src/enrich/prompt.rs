//! Prompt construction and response parsing for enrichment
//!
//! One prompt covers one collection: the field map is rendered as JSON and
//! the model is asked for an array of per-field records. Parsing accepts the
//! formats generation services actually produce: pure JSON, JSON inside
//! markdown code fences, and JSON surrounded by prose.

use serde_json::Value;

use super::error::{EnrichError, EnrichResult};
use super::repair::parse_with_repair;
use crate::models::CollectionSchema;

/// Prompt template for collection enrichment
pub const ENRICHMENT_PROMPT_TEMPLATE: &str = r#"You are a database analyst. For every field of the collection described below, provide a short semantic meaning, an importance score, and classification tags.

## Rules
1. Return one record per field, using the exact field path given
2. NEVER invent fields that are not listed
3. "semanticMeaning" is one short sentence describing what the field holds
4. "importance" is an integer from 1 (incidental) to 10 (essential)
5. "tags" is a list of short lowercase labels (e.g. "identifier", "pii", "timestamp", "money")

{context_section}## Collection
Name: {collection}

## Fields
```json
{fields}
```

## Output
Return ONLY a JSON array with one object per field:
[{"field": "<path>", "semanticMeaning": "...", "importance": 5, "tags": ["..."]}]
Do not include any explanation or markdown formatting."#;

/// Context for building an enrichment prompt
#[derive(Debug, Clone)]
pub struct EnrichmentPrompt {
    collection: String,
    fields_json: String,
    system_context: Option<String>,
}

impl EnrichmentPrompt {
    /// Build the prompt context for one collection schema
    pub fn for_schema(schema: &CollectionSchema) -> EnrichResult<Self> {
        let fields_json = serde_json::to_string_pretty(&schema.fields)?;
        Ok(Self {
            collection: schema.collection_name.clone(),
            fields_json,
            system_context: None,
        })
    }

    /// Add a free-text deployment description
    pub fn with_system_context(mut self, context: Option<String>) -> Self {
        self.system_context = context.filter(|c| !c.trim().is_empty());
        self
    }

    /// Render the final prompt
    pub fn build(&self) -> String {
        let context_section = match &self.system_context {
            Some(context) => format!("## Deployment Context\n{context}\n\n"),
            None => String::new(),
        };

        ENRICHMENT_PROMPT_TEMPLATE
            .replace("{collection}", &self.collection)
            .replace("{fields}", &self.fields_json)
            .replace("{context_section}", &context_section)
    }
}

/// Parse a completion into raw enrichment records.
///
/// The expected shape is a JSON array; a `{"fields": [...]}` wrapper is
/// unwrapped since some models insist on an enclosing object. Record-level
/// validation happens later, against the schema being enriched.
pub fn parse_enrichment_response(response: &str) -> EnrichResult<Vec<Value>> {
    let json_str = extract_json(response);
    let value = parse_with_repair(&json_str)?;
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("fields") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(EnrichError::InvalidResponse(
                "expected a JSON array of field records".to_string(),
            )),
        },
        _ => Err(EnrichError::InvalidResponse(
            "expected a JSON array of field records".to_string(),
        )),
    }
}

/// Extract JSON from a response that may contain markdown or prose
fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    // Try to find JSON in code blocks
    if let Some(start) = trimmed.find("```json") {
        let content_start = start + 7;
        if let Some(end) = trimmed[content_start..].find("```") {
            return trimmed[content_start..content_start + end]
                .trim()
                .to_string();
        }
    }

    // Try to find generic code blocks
    if let Some(start) = trimmed.find("```") {
        let content_start = start + 3;
        // Skip language identifier if present
        let content_start = trimmed[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);
        if let Some(end) = trimmed[content_start..].find("```") {
            return trimmed[content_start..content_start + end]
                .trim()
                .to_string();
        }
    }

    // Fall back to the outermost bracket pair, array or object, whichever
    // opens first
    let array_span = span_between(trimmed, '[', ']');
    let object_span = span_between(trimmed, '{', '}');
    let span = match (array_span, object_span) {
        (Some(a), Some(o)) => Some(if a.0 < o.0 { a } else { o }),
        (a, o) => a.or(o),
    };
    if let Some((start, end)) = span {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}

fn span_between(text: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then_some((start, end))
}

/// Estimate the token count for a piece of text
///
/// Uses a rough estimate of 4 characters per token
pub fn estimate_tokens(text: &str) -> usize {
    (text.len() + 3) / 4
}
