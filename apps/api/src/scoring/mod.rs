// Candidate scoring engine: label extraction, weighted similarity, and the
// pluggable per-resume scorer backends. All LLM calls go through llm_client.

pub mod embedding;
pub mod labels;
pub mod similarity;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::llm_client::LlmClient;
use crate::matching::match_resume;
use crate::models::job::JobRow;
use crate::scoring::embedding::Embedder;
use crate::scoring::labels::LabelExtractor;
use crate::scoring::similarity::{
    compute_blended_similarity, compute_weighted_similarity, DEFAULT_FUZZY_THRESHOLD,
};

/// What intake persists after scoring one resume against one job.
#[derive(Debug, Clone)]
pub struct ResumeEvaluation {
    pub resume_score: f64,
    pub detail: serde_json::Value,
}

/// The resume scorer seam. Implement this to swap scoring backends without
/// touching the intake handler.
///
/// Carried in `AppState` as `Arc<dyn ResumeScorer>`. Scoring never fails:
/// degraded inputs produce a zero or near-zero score, not an error.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, resume_text: &str, job: &JobRow) -> ResumeEvaluation;
}

/// Default backend: label extraction + weighted cosine similarity, with an
/// optional semantic blend when an embedding service is configured.
/// Deterministic and fully offline when the embedder is absent.
pub struct LabelSimilarityScorer {
    extractor: LabelExtractor,
    embedder: Option<Arc<dyn Embedder>>,
}

impl LabelSimilarityScorer {
    pub fn new(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            extractor: LabelExtractor::new(),
            embedder,
        }
    }
}

#[async_trait]
impl ResumeScorer for LabelSimilarityScorer {
    async fn score(&self, resume_text: &str, job: &JobRow) -> ResumeEvaluation {
        let jd_labels = self.extractor.extract(&job.requirements.join(" "));
        let candidate_labels = self.extractor.extract(resume_text);

        let outcome = match &self.embedder {
            Some(embedder) => {
                compute_blended_similarity(
                    &jd_labels,
                    &candidate_labels,
                    &job.priority_labels,
                    DEFAULT_FUZZY_THRESHOLD,
                    embedder.as_ref(),
                )
                .await
            }
            None => compute_weighted_similarity(
                &jd_labels,
                &candidate_labels,
                &job.priority_labels,
                DEFAULT_FUZZY_THRESHOLD,
            ),
        };

        ResumeEvaluation {
            resume_score: outcome.score,
            detail: json!({
                "matched": outcome.matched,
                "missing": outcome.missing,
            }),
        }
    }
}

/// Alternate backend: the generative matcher. Scores on the [0, 100] scale
/// and stores the extracted candidate profile as the detail record.
pub struct LlmResumeScorer {
    llm: LlmClient,
}

impl LlmResumeScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeScorer for LlmResumeScorer {
    async fn score(&self, resume_text: &str, job: &JobRow) -> ResumeEvaluation {
        let profile = match_resume(&self.llm, resume_text, &job.requirements).await;
        let resume_score = profile.resume_match;
        let detail = serde_json::to_value(&profile).unwrap_or_default();
        ResumeEvaluation {
            resume_score,
            detail,
        }
    }
}
