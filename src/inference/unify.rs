//! Cross-document schema unification
//!
//! Turns the walker's per-path observations into a finalized collection
//! schema: one field entry per observed path, a required flag resolved
//! against every sampled document, and enum promotion for paths whose
//! observations were uniformly strings.

use serde_json::Value;

use super::config::InferenceConfig;
use super::enums;
use super::walker::{FieldObservations, PathObservations};
use crate::models::{CollectionSchema, FieldInfo, FieldType};

/// Merges accumulated observations into a collection schema.
#[derive(Debug, Clone)]
pub struct SchemaUnifier {
    config: InferenceConfig,
}

impl SchemaUnifier {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Finalize every observed path into a field entry.
    ///
    /// `sample` is the document set the observations were drawn from and
    /// drives required resolution; `total_documents` is the independent
    /// collection count carried through to the schema.
    pub fn unify(
        &self,
        observations: &FieldObservations,
        sample: &[Value],
        collection_name: &str,
        total_documents: u64,
    ) -> CollectionSchema {
        let mut schema = CollectionSchema::new(collection_name, total_documents);
        for (path, observed) in observations.iter() {
            let required = !sample.is_empty()
                && sample.iter().all(|doc| resolve_path(doc, path).is_some());
            let field_type = self.merge_observed(observed);
            schema
                .fields
                .insert(path.clone(), FieldInfo { field_type, required });
        }
        schema
    }

    /// Choose the final type for one path. Uniformly-string observations go
    /// through enum detection under the sample-size threshold; everything
    /// else keeps the first observed type.
    pub fn merge_observed(&self, observed: &PathObservations) -> FieldType {
        if observed.all_strings() {
            let distinct = enums::distinct_values(observed.strings.iter().map(String::as_str));
            if enums::qualifies_within_sample(
                distinct.len(),
                observed.strings.len(),
                self.config.sample_size,
            ) {
                return FieldType::Enum { values: distinct };
            }
            return FieldType::String;
        }
        observed.first_type().cloned().unwrap_or(FieldType::Unknown)
    }
}

/// Resolve a dotted path inside one document, stepping only through objects.
///
/// A missing segment, a null value, or a non-object intermediate (arrays
/// included) short-circuits to `None`, so a field reached only through array
/// elements never resolves.
pub fn resolve_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        let Value::Object(map) = current else {
            return None;
        };
        match map.get(segment) {
            None | Some(Value::Null) => return None,
            Some(next) => current = next,
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::walker::walk_document;
    use serde_json::json;

    fn unify(docs: Vec<Value>, config: InferenceConfig) -> CollectionSchema {
        let mut observations = FieldObservations::new();
        for doc in &docs {
            let map = doc.as_object().expect("test documents are objects");
            walk_document(map, &mut observations, config.max_depth);
        }
        SchemaUnifier::new(config).unify(&observations, &docs, "test", docs.len() as u64)
    }

    #[test]
    fn test_required_when_present_in_every_document() {
        let schema = unify(
            vec![
                json!({"name": "Ada", "age": 36}),
                json!({"name": "Grace", "age": null}),
            ],
            InferenceConfig::default(),
        );
        assert!(schema.fields["name"].required);
        assert!(!schema.fields["age"].required);
    }

    #[test]
    fn test_disjoint_documents_are_all_optional() {
        let schema = unify(
            vec![json!({"a": 1}), json!({"b": 2})],
            InferenceConfig::default(),
        );
        assert!(!schema.fields["a"].required);
        assert!(!schema.fields["b"].required);
    }

    #[test]
    fn test_status_field_promotes_to_enum() {
        let schema = unify(
            vec![
                json!({"status": "active"}),
                json!({"status": "inactive"}),
                json!({"status": "active"}),
            ],
            InferenceConfig::default(),
        );
        let field = &schema.fields["status"];
        assert!(field.required);
        assert_eq!(
            field.field_type,
            FieldType::Enum {
                values: vec!["active".to_string(), "inactive".to_string()]
            }
        );
    }

    #[test]
    fn test_eleven_distinct_values_stay_string() {
        let docs: Vec<Value> = (0..22)
            .map(|i| json!({"code": format!("c{}", i % 11)}))
            .collect();
        let schema = unify(docs, InferenceConfig::default());
        assert_eq!(schema.fields["code"].field_type, FieldType::String);
    }

    #[test]
    fn test_two_values_across_twenty_documents_with_small_sample() {
        let docs: Vec<Value> = (0..20)
            .map(|i| json!({"kind": if i % 2 == 0 { "a" } else { "b" }}))
            .collect();
        let config = InferenceConfig::builder().sample_size(20).build();
        let schema = unify(docs, config);
        assert_eq!(
            schema.fields["kind"].field_type,
            FieldType::Enum {
                values: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_sample_threshold_blocks_promotion() {
        let docs = vec![
            json!({"status": "active"}),
            json!({"status": "inactive"}),
            json!({"status": "active"}),
        ];
        let config = InferenceConfig::builder().sample_size(3).build();
        let schema = unify(docs, config);
        assert_eq!(schema.fields["status"].field_type, FieldType::String);
    }

    #[test]
    fn test_first_observed_type_wins_conflicts() {
        let schema = unify(
            vec![json!({"v": 1}), json!({"v": "two"}), json!({"v": true})],
            InferenceConfig::default(),
        );
        assert_eq!(schema.fields["v"].field_type, FieldType::Number);
    }

    #[test]
    fn test_single_document_string_array_enum() {
        let schema = unify(
            vec![json!({"tags": ["x", "y", "x", "z"]})],
            InferenceConfig::default(),
        );
        assert_eq!(
            schema.fields["tags"].field_type,
            FieldType::Enum {
                values: vec!["x".to_string(), "y".to_string(), "z".to_string()]
            }
        );
    }

    #[test]
    fn test_array_subfields_never_required() {
        let schema = unify(
            vec![json!({"posts": [{"title": "a"}, {"title": "b"}]})],
            InferenceConfig::default(),
        );
        assert!(schema.fields.contains_key("posts.title"));
        assert!(!schema.fields["posts.title"].required);
    }

    #[test]
    fn test_no_fields_beyond_observed_paths() {
        let docs = vec![json!({"x": 1, "y": {"z": true}})];
        let schema = unify(docs, InferenceConfig::default());
        let paths: Vec<&str> = schema.fields.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["x", "y", "y.z"]);
    }

    #[test]
    fn test_merge_is_idempotent_over_finalized_types() {
        let unifier = SchemaUnifier::new(InferenceConfig::default());
        let finalized = [
            FieldType::Number,
            FieldType::ObjectId,
            FieldType::Enum {
                values: vec!["a".to_string(), "b".to_string()],
            },
            FieldType::array(FieldType::String),
        ];
        for field_type in finalized {
            let observed = PathObservations {
                types: vec![field_type.clone()],
                strings: Vec::new(),
            };
            assert_eq!(unifier.merge_observed(&observed), field_type);
        }
    }

    #[test]
    fn test_resolve_path_steps_only_through_objects() {
        let doc = json!({
            "a": {"b": 1},
            "list": [{"inner": true}],
            "gone": null
        });
        assert!(resolve_path(&doc, "a.b").is_some());
        assert!(resolve_path(&doc, "a.missing").is_none());
        assert!(resolve_path(&doc, "list.inner").is_none());
        assert!(resolve_path(&doc, "gone").is_none());
        assert!(resolve_path(&doc, "list").is_some());
    }
}
