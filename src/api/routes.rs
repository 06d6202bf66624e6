//! Route handlers: concept analysis, health, and service banner.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, ConceptQuery};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub concepts: Vec<String>,
}

/// `POST /analyze` — analyze 1–5 concepts and return their relationships.
///
/// The analyzer performs blocking I/O (completion + trace calls), so it
/// runs on the blocking pool.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let query = ConceptQuery::parse(&request.concepts)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(concept_count = query.len(), "Analyzing concepts");

    let analyzer = Arc::clone(&ctx.analyzer);
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&query))
        .await
        .map_err(|e| ApiError::internal(e.to_string(), ctx.config.debug))??;

    if let Some(id) = &result.analysis_id {
        tracing::info!(trace_id = %id, "Trace run recorded");
    }

    Ok(Json(result))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub openai_configured: bool,
    pub langsmith_enabled: bool,
    pub model: String,
}

/// `GET /health` — detailed health check.
pub async fn health(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        openai_configured: ctx.config.openai_configured(),
        langsmith_enabled: ctx.config.langsmith_tracing,
        model: ctx.config.openai_model.clone(),
    })
}

#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub langsmith_enabled: bool,
}

/// `GET /default` — service banner.
pub async fn banner(State(ctx): State<ApiContext>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Concept Mindmap API is running!",
        version: config::APP_VERSION,
        langsmith_enabled: ctx.config.langsmith_tracing,
    })
}
