use std::sync::Arc;

use sqlx::PgPool;

use crate::llm_client::LlmClient;
use crate::scoring::ResumeScorer;
use crate::workflow::WorkflowScheduler;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is constructed once in `main` — there are no
/// ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Pluggable resume scorer. Default: label similarity; swap to the LLM
    /// matcher via ENABLE_LLM_SCORING.
    pub scorer: Arc<dyn ResumeScorer>,
    pub scheduler: WorkflowScheduler,
}
