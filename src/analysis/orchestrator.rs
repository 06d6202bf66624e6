//! Analysis orchestrator — composes prompt building, the completion
//! call, and response validation into one request path, with optional
//! trace-run bookkeeping around it.

use serde_json::json;
use uuid::Uuid;

use super::client::{Completion, CompletionClient, CompletionRequest};
use super::parser::{parse_analysis_response, ParsedAnalysis};
use super::prompt::{build_analysis_prompt, ANALYSIS_SYSTEM_PROMPT};
use super::query::ConceptQuery;
use super::trace::{RunOutcome, TraceSink};
use super::types::{AnalysisResult, AnalysisType};
use super::AnalysisError;
use crate::config::AppConfig;

/// Sampling parameters for the completion call, resolved once from
/// configuration.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ModelSettings {
    /// Defaults match the upstream service: temperature 0.7, a token
    /// budget sized for five concepts' worth of attributes.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.openai_model.clone(),
            temperature: 0.7,
            max_tokens: 2500,
        }
    }
}

/// Seam between the HTTP layer and the orchestrator (allows stubbing in
/// router tests).
pub trait ConceptAnalysis: Send + Sync {
    fn analyze(&self, query: &ConceptQuery) -> Result<AnalysisResult, AnalysisError>;
}

/// Orchestrates one analysis request end to end.
pub struct ConceptAnalyzer<C: CompletionClient, T: TraceSink> {
    client: C,
    trace: T,
    settings: ModelSettings,
}

impl<C: CompletionClient, T: TraceSink> ConceptAnalyzer<C, T> {
    pub fn new(client: C, trace: T, settings: ModelSettings) -> Self {
        Self {
            client,
            trace,
            settings,
        }
    }

    fn complete_and_parse(
        &self,
        prompt: &str,
    ) -> Result<(ParsedAnalysis, Completion), AnalysisError> {
        let request = CompletionRequest {
            system: ANALYSIS_SYSTEM_PROMPT,
            prompt,
            model: &self.settings.model,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        let completion = self.client.complete(&request)?;
        let parsed = parse_analysis_response(&completion.text)?;
        Ok((parsed, completion))
    }

    fn open_trace_run(
        &self,
        run_id: Uuid,
        query: &ConceptQuery,
        analysis_type: AnalysisType,
        prompt: &str,
    ) {
        let name = match analysis_type {
            AnalysisType::Single => "single_concept_analysis",
            AnalysisType::Comparison => "multi_concept_analysis",
        };
        let inputs = json!({
            "concepts": query.concepts(),
            "concept_count": query.len(),
            "analysis_type": analysis_type.as_str(),
            "prompt": prompt,
        });
        if let Err(e) = self.trace.start_run(run_id, name, &inputs) {
            tracing::warn!(error = %e, %run_id, "Failed to open trace run");
        }
    }

    fn close_trace_run(&self, run_id: Uuid, outcome: RunOutcome) {
        if let Err(e) = self.trace.finish_run(run_id, outcome) {
            tracing::warn!(error = %e, %run_id, "Failed to close trace run");
        }
    }
}

impl<C: CompletionClient, T: TraceSink> ConceptAnalysis for ConceptAnalyzer<C, T> {
    /// One completion call, one parse pass, one surfaced outcome. Trace
    /// failures are logged and never mask the primary result or error.
    fn analyze(&self, query: &ConceptQuery) -> Result<AnalysisResult, AnalysisError> {
        let analysis_type = if query.is_single() {
            AnalysisType::Single
        } else {
            AnalysisType::Comparison
        };
        let prompt = build_analysis_prompt(query);

        let run_id = self.trace.enabled().then(Uuid::new_v4);
        if let Some(id) = run_id {
            self.open_trace_run(id, query, analysis_type, &prompt);
        }

        match self.complete_and_parse(&prompt) {
            Ok((parsed, completion)) => {
                let result = AnalysisResult {
                    concepts: parsed.concepts,
                    shared_concepts: parsed.shared_concepts,
                    analysis_type,
                    analysis_id: run_id.map(|id| id.to_string()),
                };
                if let Some(id) = run_id {
                    let outputs = json!({
                        "result": result,
                        "raw_response": completion.text,
                        "tokens_used": completion.total_tokens,
                    });
                    self.close_trace_run(id, RunOutcome::Succeeded(outputs));
                }
                tracing::info!(
                    concept_count = query.len(),
                    analysis_type = analysis_type.as_str(),
                    tokens = completion.total_tokens,
                    "Analysis completed"
                );
                Ok(result)
            }
            Err(err) => {
                if let Some(id) = run_id {
                    self.close_trace_run(id, RunOutcome::Failed(err.to_string()));
                }
                Err(err)
            }
        }
    }
}
