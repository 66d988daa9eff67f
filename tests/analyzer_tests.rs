//! End-to-end analyzer tests
//!
//! Drive the full analysis pass over in-memory sources: strategy selection,
//! structural inference, enrichment, and artifact persistence.

use std::sync::Mutex;

use async_trait::async_trait;
use mongolens::analyzer::{AnalysisConfig, AnalyzeError, SchemaAnalyzer};
use mongolens::enrich::{
    EnrichError, EnrichResult, EnrichmentConfig, FieldEnricher, TextGenerator,
};
use mongolens::inference::InferenceConfig;
use mongolens::models::{FieldType, PRIMARY_ID_FIELD};
use mongolens::source::MemorySource;
use mongolens::store::{ArtifactStore, MemoryArtifactStore};
use serde_json::json;

/// Text generator fed from a fixed queue of responses; an exhausted queue
/// fails like an unreachable service.
struct ScriptedGenerator {
    responses: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, _prompt: &str) -> EnrichResult<String> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(EnrichError::ConnectionError(
                "no scripted response".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn max_tokens(&self) -> usize {
        4096
    }

    async fn is_ready(&self) -> bool {
        true
    }
}

fn analyzer() -> SchemaAnalyzer {
    SchemaAnalyzer::new(AnalysisConfig::default()).unwrap()
}

fn enrichment_config() -> EnrichmentConfig {
    // No retries so scripted failures surface immediately
    EnrichmentConfig::with_ollama("scripted").with_max_retries(0)
}

mod extraction_chain_tests {
    use super::*;

    #[tokio::test]
    async fn test_declared_schema_wins_over_documents() {
        let source = MemorySource::new("shop")
            .with_collection("users", vec![json!({"sampled_only": 1})])
            .with_declared_schema(
                "users",
                json!({
                    "name": {"type": "String", "required": true},
                    "age": "Number"
                }),
            );

        let schema = analyzer().analyze_collection(&source, "users").await.unwrap();
        assert_eq!(
            schema.fields["name"].field_type,
            FieldType::String
        );
        assert!(schema.fields["name"].required);
        assert!(!schema.fields["age"].required);
        assert!(!schema.fields.contains_key("sampled_only"));
    }

    #[tokio::test]
    async fn test_validation_rules_when_no_declaration() {
        let source = MemorySource::new("shop")
            .with_collection("users", vec![json!({"sampled_only": 1})])
            .with_validation_rules(
                "users",
                json!({
                    "$jsonSchema": {
                        "bsonType": "object",
                        "required": ["email"],
                        "properties": {
                            "email": {"bsonType": "string"},
                            "age": {"bsonType": "int"}
                        }
                    }
                }),
            );

        let schema = analyzer().analyze_collection(&source, "users").await.unwrap();
        assert!(schema.fields["email"].required);
        assert_eq!(schema.fields["age"].field_type, FieldType::Number);
        assert!(!schema.fields.contains_key("sampled_only"));
    }

    #[tokio::test]
    async fn test_sampling_when_no_artifacts() {
        let source = MemorySource::new("shop").with_collection(
            "users",
            vec![json!({"name": "Ada", "active": true})],
        );

        let schema = analyzer().analyze_collection(&source, "users").await.unwrap();
        assert_eq!(schema.fields["name"].field_type, FieldType::String);
        assert_eq!(schema.fields["active"].field_type, FieldType::Boolean);
    }

    #[tokio::test]
    async fn test_empty_collection_yields_empty_schema() {
        let source = MemorySource::new("shop").with_collection("empty", Vec::new());

        let schema = analyzer().analyze_collection(&source, "empty").await.unwrap();
        assert_eq!(schema.total_documents, 0);
        assert!(schema.fields.is_empty());
    }
}

mod inference_scenario_tests {
    use super::*;

    #[tokio::test]
    async fn test_repeating_status_becomes_required_enum() {
        let source = MemorySource::new("shop").with_collection(
            "orders",
            vec![
                json!({"status": "active"}),
                json!({"status": "inactive"}),
                json!({"status": "active"}),
            ],
        );

        let schema = analyzer().analyze_collection(&source, "orders").await.unwrap();
        let status = &schema.fields["status"];
        assert_eq!(
            status.field_type,
            FieldType::Enum {
                values: vec!["active".to_string(), "inactive".to_string()]
            }
        );
        assert!(status.required);
    }

    #[tokio::test]
    async fn test_disjoint_fields_are_optional() {
        let source = MemorySource::new("shop")
            .with_collection("things", vec![json!({"a": 1}), json!({"b": 2})]);

        let schema = analyzer().analyze_collection(&source, "things").await.unwrap();
        assert!(!schema.fields["a"].required);
        assert!(!schema.fields["b"].required);
    }

    #[tokio::test]
    async fn test_eleven_distinct_values_stay_string() {
        let documents = (0..11)
            .map(|i| json!({"code": format!("value-{i}")}))
            .collect();
        let source = MemorySource::new("shop").with_collection("codes", documents);

        let schema = analyzer().analyze_collection(&source, "codes").await.unwrap();
        assert_eq!(schema.fields["code"].field_type, FieldType::String);
    }

    #[tokio::test]
    async fn test_identifier_buffers_three_levels_deep() {
        let source = MemorySource::new("shop").with_collection(
            "links",
            vec![json!({
                "outer": {
                    "inner": {
                        "ref": {"buffer": [7, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]}
                    }
                }
            })],
        );

        let schema = analyzer().analyze_collection(&source, "links").await.unwrap();
        assert_eq!(
            schema.fields["outer.inner.ref"].field_type,
            FieldType::ObjectId
        );
        assert!(!schema.fields.contains_key("outer.inner.ref.buffer"));
    }

    #[tokio::test]
    async fn test_tags_array_in_single_document_is_enum() {
        let source = MemorySource::new("shop")
            .with_collection("posts", vec![json!({"tags": ["x", "y", "x", "z"]})]);

        let schema = analyzer().analyze_collection(&source, "posts").await.unwrap();
        assert_eq!(
            schema.fields["tags"].field_type,
            FieldType::Enum {
                values: vec!["x".to_string(), "y".to_string(), "z".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_first_observed_type_wins_on_conflict() {
        let source = MemorySource::new("shop").with_collection(
            "mixed",
            vec![json!({"value": 1}), json!({"value": "text"})],
        );

        let schema = analyzer().analyze_collection(&source, "mixed").await.unwrap();
        assert_eq!(schema.fields["value"].field_type, FieldType::Number);
    }

    #[tokio::test]
    async fn test_primary_id_is_never_a_field() {
        let source = MemorySource::new("shop").with_collection(
            "users",
            vec![json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}, "name": "Ada"})],
        );

        let schema = analyzer().analyze_collection(&source, "users").await.unwrap();
        assert!(!schema.fields.contains_key(PRIMARY_ID_FIELD));
        assert!(schema.fields.contains_key("name"));
    }

    #[tokio::test]
    async fn test_sample_size_bounds_the_draw_but_not_the_count() {
        let config = AnalysisConfig::new()
            .with_inference(InferenceConfig::builder().sample_size(2).build());
        let analyzer = SchemaAnalyzer::new(config).unwrap();
        let source = MemorySource::new("shop").with_collection(
            "events",
            vec![
                json!({"kind": "click"}),
                json!({"kind": "view"}),
                json!({"kind": "click", "unsampled": true}),
            ],
        );

        let schema = analyzer.analyze_collection(&source, "events").await.unwrap();
        assert_eq!(schema.total_documents, 3);
        assert!(!schema.fields.contains_key("unsampled"));
    }
}

mod enrichment_tests {
    use super::*;

    fn users_source() -> MemorySource {
        MemorySource::new("shop").with_collection(
            "users",
            vec![
                json!({"email": "ada@example.com", "age": 36}),
                json!({"email": "grace@example.com", "age": 45}),
            ],
        )
    }

    fn users_response() -> String {
        json!([
            {
                "field": "email",
                "semanticMeaning": "Account contact address",
                "importance": 9,
                "tags": ["contact", "pii"]
            },
            {
                "field": "age",
                "semanticMeaning": "Account holder age in years",
                "importance": 4,
                "tags": ["demographics"]
            }
        ])
        .to_string()
    }

    #[tokio::test]
    async fn test_enrichment_applies_to_analyzed_database() {
        let config = AnalysisConfig::new().with_enrichment(enrichment_config());
        let analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
        let enricher = FieldEnricher::new(
            ScriptedGenerator::new(vec![users_response()]),
            config.enrichment,
        );

        let database = analyzer
            .analyze_database(&users_source(), Some(&enricher), None)
            .await
            .unwrap();

        let users = &database.collections[0];
        assert_eq!(users.enriched_count(), 2);
        let email = users.fields.iter().find(|f| f.field == "email").unwrap();
        let meta = email.enrichment.as_ref().unwrap();
        assert_eq!(meta.importance, 9);
        assert_eq!(meta.tags, vec!["contact", "pii"]);
    }

    #[tokio::test]
    async fn test_missing_record_is_an_explicit_gap() {
        let partial = json!([
            {
                "field": "email",
                "semanticMeaning": "Account contact address",
                "importance": 9,
                "tags": []
            }
        ])
        .to_string();

        let config = AnalysisConfig::new().with_enrichment(enrichment_config());
        let analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
        let enricher =
            FieldEnricher::new(ScriptedGenerator::new(vec![partial]), config.enrichment);

        let database = analyzer
            .analyze_database(&users_source(), Some(&enricher), None)
            .await
            .unwrap();

        let users = &database.collections[0];
        assert_eq!(users.enriched_count(), 1);
        let age = users.fields.iter().find(|f| f.field == "age").unwrap();
        assert!(age.enrichment.is_none());
    }

    #[tokio::test]
    async fn test_fabricated_fields_are_dropped() {
        let fabricated = json!([
            {
                "field": "email",
                "semanticMeaning": "Account contact address",
                "importance": 9,
                "tags": []
            },
            {
                "field": "loyalty_score",
                "semanticMeaning": "Does not exist in the schema",
                "importance": 5,
                "tags": []
            }
        ])
        .to_string();

        let config = AnalysisConfig::new().with_enrichment(enrichment_config());
        let analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
        let enricher =
            FieldEnricher::new(ScriptedGenerator::new(vec![fabricated]), config.enrichment);

        let database = analyzer
            .analyze_database(&users_source(), Some(&enricher), None)
            .await
            .unwrap();

        let users = &database.collections[0];
        assert_eq!(users.enriched_count(), 1);
        assert!(users.fields.iter().all(|f| f.field != "loyalty_score"));
    }

    #[tokio::test]
    async fn test_enrichment_failure_aborts_before_store() {
        let source = MemorySource::new("shop")
            .with_collection("users", vec![json!({"email": "ada@example.com"})])
            .with_collection("orders", vec![json!({"total": 10})]);

        let only_first = json!([
            {
                "field": "email",
                "semanticMeaning": "Account contact address",
                "importance": 9,
                "tags": []
            }
        ])
        .to_string();

        let config = AnalysisConfig::new().with_enrichment(enrichment_config());
        let analyzer = SchemaAnalyzer::new(config.clone()).unwrap();
        let enricher =
            FieldEnricher::new(ScriptedGenerator::new(vec![only_first]), config.enrichment);
        let store = MemoryArtifactStore::new();

        let err = analyzer
            .analyze_database(&source, Some(&enricher), Some(&store))
            .await
            .unwrap_err();

        match err {
            AnalyzeError::Enrichment { collection, .. } => assert_eq!(collection, "orders"),
            other => panic!("expected enrichment error, got {other}"),
        }
        assert!(!store.exists("shop").await.unwrap());
    }
}

mod persistence_tests {
    use super::*;

    #[tokio::test]
    async fn test_artifact_is_keyed_by_database_name() {
        let source = MemorySource::new("shop")
            .with_collection("users", vec![json!({"name": "Ada"})]);
        let store = MemoryArtifactStore::new();

        let database = analyzer()
            .analyze_database(&source, None, Some(&store))
            .await
            .unwrap();

        let stored = store.get("shop").await.unwrap().unwrap();
        assert_eq!(stored.database_name, "shop");
        assert_eq!(stored.collections.len(), database.collections.len());
    }

    #[tokio::test]
    async fn test_new_run_replaces_previous_artifact() {
        let store = MemoryArtifactStore::new();

        let first = MemorySource::new("shop").with_collection("users", vec![json!({"a": 1})]);
        analyzer()
            .analyze_database(&first, None, Some(&store))
            .await
            .unwrap();

        let second = MemorySource::new("shop")
            .with_collection("users", vec![json!({"a": 1})])
            .with_collection("orders", vec![json!({"b": 2})]);
        analyzer()
            .analyze_database(&second, None, Some(&store))
            .await
            .unwrap();

        let stored = store.get("shop").await.unwrap().unwrap();
        assert_eq!(stored.collections.len(), 2);
    }

    #[tokio::test]
    async fn test_discovery_follows_source_order() {
        let source = MemorySource::new("shop")
            .with_collection("zebra", vec![json!({"z": 1})])
            .with_collection("alpha", vec![json!({"a": 1})]);

        let database = analyzer().analyze_database(&source, None, None).await.unwrap();
        let names: Vec<&str> = database
            .collections
            .iter()
            .map(|c| c.collection_name.as_str())
            .collect();
        assert_eq!(names, vec!["zebra", "alpha"]);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_invalid_enrichment_config_fails_fast() {
        let mut enrichment = EnrichmentConfig::with_ollama("llama3.2");
        enrichment.base_url = "localhost:11434".to_string();

        let config = AnalysisConfig::new().with_enrichment(enrichment);
        assert!(matches!(
            SchemaAnalyzer::new(config),
            Err(AnalyzeError::Config(_))
        ));
    }
}
