//! Single-pass repair of almost-JSON output
//!
//! Generated output is usually valid JSON; when it is not, the failure is
//! almost always one of two habits: unquoted object keys and trailing
//! commas. One sanitize pass fixes exactly those two. Anything still
//! unparseable propagates the original parse error; repair never loops.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::error::{EnrichError, EnrichResult};

static BARE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)(\s*:)").unwrap());

static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*[}\]])").unwrap());

/// Parse `raw` as JSON, retrying once through [`sanitize`] on failure.
pub fn parse_with_repair(raw: &str) -> EnrichResult<Value> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(first_error) => match serde_json::from_str(&sanitize(raw)) {
            Ok(value) => {
                debug!("enrichment output parsed after sanitize pass");
                Ok(value)
            }
            Err(_) => Err(EnrichError::ParseError(first_error.to_string())),
        },
    }
}

/// Quote bare object keys and strip trailing commas.
fn sanitize(raw: &str) -> String {
    let quoted = BARE_KEY.replace_all(raw, "${1}\"${2}\"${3}");
    TRAILING_COMMA.replace_all(&quoted, "${1}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_json_passes_through() {
        let value = parse_with_repair(r#"[{"field": "name"}]"#).unwrap();
        assert_eq!(value, json!([{"field": "name"}]));
    }

    #[test]
    fn test_bare_keys_are_quoted() {
        let value = parse_with_repair(r#"{field: "name", importance: 5}"#).unwrap();
        assert_eq!(value, json!({"field": "name", "importance": 5}));
    }

    #[test]
    fn test_trailing_commas_are_stripped() {
        let value = parse_with_repair("[{\"a\": 1,}, {\"b\": [2, 3,]},]").unwrap();
        assert_eq!(value, json!([{"a": 1}, {"b": [2, 3]}]));
    }

    #[test]
    fn test_both_habits_together() {
        let value = parse_with_repair(r#"{tags: ["pii", "email",],}"#).unwrap();
        assert_eq!(value, json!({"tags": ["pii", "email"]}));
    }

    #[test]
    fn test_hopeless_input_reports_original_error() {
        let result = parse_with_repair("certainly! here are the fields");
        assert!(matches!(result, Err(EnrichError::ParseError(_))));
    }

    #[test]
    fn test_repair_runs_only_once() {
        // Still broken after sanitize (unbalanced bracket)
        let result = parse_with_repair(r#"[{field: "a"}"#);
        assert!(matches!(result, Err(EnrichError::ParseError(_))));
    }
}
