use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::matching::JobMatcher;
use crate::storage::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Compiled vocabulary, entity recognizer, and word-cloud renderer.
    pub analyzer: Arc<ResumeAnalyzer>,
    /// Pluggable matcher. Default: KeywordJobMatcher.
    pub matcher: Arc<dyn JobMatcher>,
    /// PostgreSQL when DATABASE_URL is set, otherwise in-memory.
    pub store: Arc<dyn AnalysisStore>,
}
