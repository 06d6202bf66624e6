//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::analysis::ConceptAnalysis;
use crate::config::AppConfig;

/// Shared context for all routes: the analyzer behind its trait seam plus
/// the read-only configuration. Cheap to clone per request.
#[derive(Clone)]
pub struct ApiContext {
    pub analyzer: Arc<dyn ConceptAnalysis>,
    pub config: Arc<AppConfig>,
}

impl ApiContext {
    pub fn new(analyzer: Arc<dyn ConceptAnalysis>, config: Arc<AppConfig>) -> Self {
        Self { analyzer, config }
    }
}
