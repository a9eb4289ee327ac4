use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::{generate_questions, QaPair};
use crate::models::job::JobRow;
use crate::state::AppState;
use crate::workflow::StageTimings;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub department: String,
    pub requirements: Vec<String>,
    #[serde(default)]
    pub priority_labels: Vec<String>,
    #[serde(default)]
    pub problem_statements: Vec<String>,
    pub hr_id: Uuid,
    #[serde(flatten)]
    pub timings: StageTimings,
}

/// POST /api/v1/jobs
///
/// Creates the job and arms its five-stage workflow.
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<Value>, AppError> {
    if req.requirements.is_empty() {
        return Err(AppError::Validation(
            "requirements must not be empty".to_string(),
        ));
    }
    if !req.timings.is_ordered() {
        return Err(AppError::Validation(
            "stage timestamps must be strictly increasing".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO jobs (id, title, department, requirements, priority_labels,
                           problem_statements, hr_id, resume_start, resume_end,
                           coding_start, coding_end, interview_start)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(id)
    .bind(&req.title)
    .bind(&req.department)
    .bind(&req.requirements)
    .bind(&req.priority_labels)
    .bind(&req.problem_statements)
    .bind(req.hr_id)
    .bind(req.timings.resume_start)
    .bind(req.timings.resume_end)
    .bind(req.timings.coding_start)
    .bind(req.timings.coding_end)
    .bind(req.timings.interview_start)
    .execute(&state.db)
    .await?;

    state.scheduler.schedule(id, &req.timings);

    Ok(Json(json!({ "message": "Job created", "id": id })))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(jobs))
}

/// POST /api/v1/jobs/:id/schedule
///
/// Re-arms the workflow from the stored stage timestamps (e.g. after a
/// process restart).
pub async fn handle_schedule_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = fetch_job(&state.db, id).await?;
    let timings = StageTimings {
        resume_start: job.resume_start,
        resume_end: job.resume_end,
        coding_start: job.coding_start,
        coding_end: job.coding_end,
        interview_start: job.interview_start,
    };
    state.scheduler.schedule(id, &timings);
    Ok(Json(json!({ "message": "Workflow scheduled", "job_id": id })))
}

/// GET /api/v1/jobs/:id/questions
///
/// Generates coding-round question material from the job's requirements.
pub async fn handle_job_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<QaPair>>, AppError> {
    let job = fetch_job(&state.db, id).await?;
    let questions = generate_questions(&state.llm, &job.requirements).await;
    Ok(Json(questions))
}

pub(crate) async fn fetch_job(pool: &PgPool, id: Uuid) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}
