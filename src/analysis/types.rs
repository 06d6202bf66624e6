use serde::{Deserialize, Serialize};

/// Lower bound on `unique` attributes per concept (inclusive).
pub const MIN_UNIQUE: usize = 5;
/// Upper bound on `unique` attributes per concept (inclusive).
pub const MAX_UNIQUE: usize = 12;

/// One analyzed concept: its name and 5–12 distinguishing attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    pub name: String,
    pub unique: Vec<String>,
}

/// Whether a request analyzed one concept or compared several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Single,
    Comparison,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Single => "single",
            AnalysisType::Comparison => "comparison",
        }
    }
}

/// Complete result of one analysis request.
///
/// Constructed once from a successfully parsed completion and returned
/// immediately; never mutated, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub concepts: Vec<ConceptRecord>,
    pub shared_concepts: Vec<String>,
    pub analysis_type: AnalysisType,
    /// Trace run id, present when tracing is enabled.
    pub analysis_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AnalysisType::Single).unwrap(),
            "\"single\""
        );
        assert_eq!(
            serde_json::to_string(&AnalysisType::Comparison).unwrap(),
            "\"comparison\""
        );
        assert_eq!(AnalysisType::Single.as_str(), "single");
    }

    #[test]
    fn result_serializes_wire_fields() {
        let result = AnalysisResult {
            concepts: vec![ConceptRecord {
                name: "AI".into(),
                unique: vec!["a".into(), "b".into(), "c".into(), "d".into(), "e".into()],
            }],
            shared_concepts: vec![],
            analysis_type: AnalysisType::Single,
            analysis_id: Some("run-1".into()),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert_eq!(json["analysis_type"], "single");
        assert_eq!(json["analysis_id"], "run-1");
        assert_eq!(json["concepts"][0]["unique"].as_array().unwrap().len(), 5);
        assert_eq!(json["shared_concepts"].as_array().unwrap().len(), 0);
    }
}
