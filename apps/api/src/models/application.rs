use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of one application across the pipeline stages.
///
/// The single authoritative status representation — persisted as snake_case
/// text, never as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Shortlisted,
    NotSelected,
    ShortlistedForHr,
    NotShortlistedForHr,
    Interview,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::NotSelected => "not_selected",
            ApplicationStatus::ShortlistedForHr => "shortlisted_for_hr",
            ApplicationStatus::NotShortlistedForHr => "not_shortlisted_for_hr",
            ApplicationStatus::Interview => "interview",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "applied" => Some(ApplicationStatus::Applied),
            "shortlisted" => Some(ApplicationStatus::Shortlisted),
            "not_selected" => Some(ApplicationStatus::NotSelected),
            "shortlisted_for_hr" => Some(ApplicationStatus::ShortlistedForHr),
            "not_shortlisted_for_hr" => Some(ApplicationStatus::NotShortlistedForHr),
            "interview" => Some(ApplicationStatus::Interview),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (job, candidate) pairing as returned by list endpoints.
/// The raw resume bytes are deliberately not part of this view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_filename: String,
    pub resume_content_type: String,
    pub resume_text: Option<String>,
    /// Client-supplied structured detail, validated as a JSON object at intake.
    pub resume_detail: Value,
    /// Scorer output: matched/missing labels or the extracted candidate profile.
    pub score_detail: Value,
    pub resume_score: f64,
    pub technical_score: Option<f64>,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

/// The narrow projection the selector ranks on.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_score: f64,
    pub status: String,
}
