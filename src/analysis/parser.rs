//! Response-contract enforcement — the schema gate between the model's
//! free-text completion and the typed `ConceptRecord`s the API returns.
//!
//! Validation runs in stages, each short-circuiting with its own
//! `ParseError` variant so a failed request says exactly which stage and
//! which element broke. The parser never repairs or re-requests: one
//! malformed completion is one failure.

use serde_json::Value;
use thiserror::Error;

use super::types::{ConceptRecord, MAX_UNIQUE, MIN_UNIQUE};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Response is not a JSON object")]
    NotAnObject,

    #[error("Missing required key: '{0}'")]
    MissingKey(&'static str),

    #[error("'concepts' must be a list with at least 1 item")]
    EmptyConcepts,

    #[error("Concept {index} is not a valid object")]
    ConceptNotObject { index: usize },

    #[error("Concept {index} missing required fields: 'name', 'unique'")]
    ConceptMissingFields { index: usize },

    #[error("Concept {index}: '{field}' must contain strings")]
    ConceptFieldNotString { index: usize, field: &'static str },

    #[error("Concept {index}: 'unique' must be a list")]
    UniqueNotList { index: usize },

    #[error("Concept {index}: 'unique' must have {MIN_UNIQUE}-{MAX_UNIQUE} items, got {count}")]
    UniqueCountOutOfRange { index: usize, count: usize },

    #[error("'shared_concepts' must be a list")]
    SharedConceptsNotList,

    #[error("'shared_concepts' must contain strings")]
    SharedConceptNotString,
}

/// Structured payload recovered from a completion, prior to the
/// orchestrator attaching analysis type and trace metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnalysis {
    pub concepts: Vec<ConceptRecord>,
    pub shared_concepts: Vec<String>,
}

/// Parse and validate a raw completion into a `ParsedAnalysis`.
pub fn parse_analysis_response(raw: &str) -> Result<ParsedAnalysis, ParseError> {
    let sanitized = strip_code_fences(raw);

    let value: Value =
        serde_json::from_str(&sanitized).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let concepts_value = object
        .get("concepts")
        .ok_or(ParseError::MissingKey("concepts"))?;
    let shared_value = object
        .get("shared_concepts")
        .ok_or(ParseError::MissingKey("shared_concepts"))?;

    let concept_items = concepts_value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or(ParseError::EmptyConcepts)?;

    let mut concepts = Vec::with_capacity(concept_items.len());
    for (i, item) in concept_items.iter().enumerate() {
        concepts.push(validate_concept(i + 1, item)?);
    }

    let shared_items = shared_value
        .as_array()
        .ok_or(ParseError::SharedConceptsNotList)?;
    let mut shared_concepts = Vec::with_capacity(shared_items.len());
    for item in shared_items {
        let text = item
            .as_str()
            .ok_or(ParseError::SharedConceptNotString)?;
        shared_concepts.push(text.to_string());
    }

    Ok(ParsedAnalysis {
        concepts,
        shared_concepts,
    })
}

/// Validate one element of the `concepts` array. `index` is 1-based for
/// error messages. Keys beyond `name` and `unique` are ignored.
fn validate_concept(index: usize, item: &Value) -> Result<ConceptRecord, ParseError> {
    let object = item
        .as_object()
        .ok_or(ParseError::ConceptNotObject { index })?;

    let (name_value, unique_value) = match (object.get("name"), object.get("unique")) {
        (Some(name), Some(unique)) => (name, unique),
        _ => return Err(ParseError::ConceptMissingFields { index }),
    };

    let name = name_value
        .as_str()
        .ok_or(ParseError::ConceptFieldNotString {
            index,
            field: "name",
        })?;

    let unique_items = unique_value
        .as_array()
        .ok_or(ParseError::UniqueNotList { index })?;

    let count = unique_items.len();
    if !(MIN_UNIQUE..=MAX_UNIQUE).contains(&count) {
        return Err(ParseError::UniqueCountOutOfRange { index, count });
    }

    let mut unique = Vec::with_capacity(count);
    for entry in unique_items {
        let text = entry.as_str().ok_or(ParseError::ConceptFieldNotString {
            index,
            field: "unique",
        })?;
        unique.push(text.to_string());
    }

    Ok(ConceptRecord {
        name: name.to_string(),
        unique,
    })
}

/// Best-effort strip of surrounding Markdown code fences.
///
/// Tolerates fences present or absent, an optional language tag after the
/// opening fence, and missing newlines around either fence. Not a
/// Markdown parser — only leading/trailing fences are touched.
fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag (e.g. "json") up to the first
        // newline; a fence with no newline ("```{...}") keeps the body.
        let rest_trimmed = rest.trim_start();
        text = match rest_trimmed.split_once('\n') {
            Some((first_line, body)) if is_language_tag(first_line.trim()) => body,
            _ => rest,
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim().to_string()
}

/// A fence "language tag" is a short alphanumeric word (or nothing).
fn is_language_tag(candidate: &str) -> bool {
    candidate.len() <= 12 && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str =
        r#"{"concepts":[{"name":"A","unique":["a","b","c","d","e"]}],"shared_concepts":[]}"#;

    #[test]
    fn well_formed_response_round_trips() {
        let parsed = parse_analysis_response(WELL_FORMED).unwrap();
        assert_eq!(parsed.concepts.len(), 1);
        assert_eq!(parsed.concepts[0].name, "A");
        assert_eq!(parsed.concepts[0].unique.len(), 5);
        assert!(parsed.shared_concepts.is_empty());
    }

    #[test]
    fn fenced_response_parses_identically() {
        let fenced = format!("```json\n{WELL_FORMED}\n```");
        assert_eq!(
            parse_analysis_response(&fenced).unwrap(),
            parse_analysis_response(WELL_FORMED).unwrap()
        );
    }

    #[test]
    fn fence_without_language_tag() {
        let fenced = format!("```\n{WELL_FORMED}\n```");
        assert!(parse_analysis_response(&fenced).is_ok());
    }

    #[test]
    fn fence_without_trailing_newline() {
        let fenced = format!("```json\n{WELL_FORMED}```");
        assert!(parse_analysis_response(&fenced).is_ok());
    }

    #[test]
    fn fence_with_surrounding_whitespace() {
        let fenced = format!("\n\n  ```json\n{WELL_FORMED}\n```  \n");
        assert!(parse_analysis_response(&fenced).is_ok());
    }

    #[test]
    fn unclosed_fence_still_parses() {
        let fenced = format!("```json\n{WELL_FORMED}");
        assert!(parse_analysis_response(&fenced).is_ok());
    }

    #[test]
    fn malformed_json_reports_syntax_error() {
        let err = parse_analysis_response("{not valid json").unwrap_err();
        match err {
            ParseError::InvalidJson(message) => assert!(!message.is_empty()),
            other => panic!("expected InvalidJson, got {other:?}"),
        }
    }

    #[test]
    fn top_level_array_rejected() {
        assert_eq!(
            parse_analysis_response("[1,2,3]").unwrap_err(),
            ParseError::NotAnObject
        );
    }

    #[test]
    fn missing_concepts_key() {
        assert_eq!(
            parse_analysis_response(r#"{"shared_concepts":[]}"#).unwrap_err(),
            ParseError::MissingKey("concepts")
        );
    }

    #[test]
    fn missing_shared_concepts_key_names_it() {
        let err = parse_analysis_response(
            r#"{"concepts":[{"name":"A","unique":["a","b","c","d","e"]}]}"#,
        )
        .unwrap_err();
        assert_eq!(err, ParseError::MissingKey("shared_concepts"));
        assert!(err.to_string().contains("shared_concepts"));
    }

    #[test]
    fn empty_concepts_array_rejected() {
        assert_eq!(
            parse_analysis_response(r#"{"concepts":[],"shared_concepts":[]}"#).unwrap_err(),
            ParseError::EmptyConcepts
        );
    }

    #[test]
    fn concepts_not_a_list_rejected() {
        assert_eq!(
            parse_analysis_response(r#"{"concepts":"A","shared_concepts":[]}"#).unwrap_err(),
            ParseError::EmptyConcepts
        );
    }

    #[test]
    fn non_object_concept_reports_index() {
        let err = parse_analysis_response(r#"{"concepts":["A"],"shared_concepts":[]}"#)
            .unwrap_err();
        assert_eq!(err, ParseError::ConceptNotObject { index: 1 });
        assert!(err.to_string().contains("Concept 1"));
    }

    #[test]
    fn concept_missing_unique_field() {
        let err =
            parse_analysis_response(r#"{"concepts":[{"name":"A"}],"shared_concepts":[]}"#)
                .unwrap_err();
        assert_eq!(err, ParseError::ConceptMissingFields { index: 1 });
    }

    #[test]
    fn unique_not_a_list() {
        let err = parse_analysis_response(
            r#"{"concepts":[{"name":"A","unique":"a"}],"shared_concepts":[]}"#,
        )
        .unwrap_err();
        assert_eq!(err, ParseError::UniqueNotList { index: 1 });
    }

    #[test]
    fn four_unique_items_rejected_with_count() {
        let err = parse_analysis_response(
            r#"{"concepts":[{"name":"A","unique":["a","b","c","d"]}],"shared_concepts":[]}"#,
        )
        .unwrap_err();
        assert_eq!(err, ParseError::UniqueCountOutOfRange { index: 1, count: 4 });
        assert!(err.to_string().contains("got 4"));
    }

    #[test]
    fn thirteen_unique_items_rejected_with_count() {
        let unique: Vec<String> = (0..13).map(|i| format!("\"u{i}\"")).collect();
        let raw = format!(
            r#"{{"concepts":[{{"name":"A","unique":[{}]}}],"shared_concepts":[]}}"#,
            unique.join(",")
        );
        let err = parse_analysis_response(&raw).unwrap_err();
        assert_eq!(
            err,
            ParseError::UniqueCountOutOfRange {
                index: 1,
                count: 13
            }
        );
    }

    #[test]
    fn error_index_points_at_second_concept() {
        let raw = r#"{"concepts":[
            {"name":"A","unique":["a","b","c","d","e"]},
            {"name":"B","unique":["a","b"]}
        ],"shared_concepts":[]}"#;
        assert_eq!(
            parse_analysis_response(raw).unwrap_err(),
            ParseError::UniqueCountOutOfRange { index: 2, count: 2 }
        );
    }

    #[test]
    fn shared_concepts_not_a_list() {
        let raw = r#"{"concepts":[{"name":"A","unique":["a","b","c","d","e"]}],"shared_concepts":"x"}"#;
        assert_eq!(
            parse_analysis_response(raw).unwrap_err(),
            ParseError::SharedConceptsNotList
        );
    }

    #[test]
    fn shared_concepts_preserved_in_order() {
        let raw = r#"{"concepts":[{"name":"A","unique":["a","b","c","d","e"]}],"shared_concepts":["x","y","z"]}"#;
        let parsed = parse_analysis_response(raw).unwrap();
        assert_eq!(parsed.shared_concepts, vec!["x", "y", "z"]);
    }

    #[test]
    fn extra_keys_are_ignored() {
        let raw = r#"{
            "concepts":[{"name":"A","unique":["a","b","c","d","e"],"confidence":0.9}],
            "shared_concepts":[],
            "commentary":"ignore me"
        }"#;
        let parsed = parse_analysis_response(raw).unwrap();
        assert_eq!(parsed.concepts[0].name, "A");
    }

    #[test]
    fn twelve_unique_items_accepted() {
        let unique: Vec<String> = (0..12).map(|i| format!("\"u{i}\"")).collect();
        let raw = format!(
            r#"{{"concepts":[{{"name":"A","unique":[{}]}}],"shared_concepts":[]}}"#,
            unique.join(",")
        );
        let parsed = parse_analysis_response(&raw).unwrap();
        assert_eq!(parsed.concepts[0].unique.len(), 12);
    }

    #[test]
    fn non_string_name_rejected() {
        let raw = r#"{"concepts":[{"name":7,"unique":["a","b","c","d","e"]}],"shared_concepts":[]}"#;
        assert_eq!(
            parse_analysis_response(raw).unwrap_err(),
            ParseError::ConceptFieldNotString {
                index: 1,
                field: "name"
            }
        );
    }
}
