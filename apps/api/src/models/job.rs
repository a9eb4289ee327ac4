use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting with its requirement labels and the five stage timestamps
/// that drive the hiring workflow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub department: String,
    /// Requirement labels the scorer matches candidate labels against.
    pub requirements: Vec<String>,
    /// Labels weighted double during similarity scoring.
    pub priority_labels: Vec<String>,
    pub problem_statements: Vec<String>,
    pub hr_id: Uuid,
    pub posted_at: DateTime<Utc>,
    pub resume_start: DateTime<Utc>,
    pub resume_end: DateTime<Utc>,
    pub coding_start: DateTime<Utc>,
    pub coding_end: DateTime<Utc>,
    pub interview_start: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
