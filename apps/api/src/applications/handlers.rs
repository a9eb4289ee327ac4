use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::applications::extract::extract_text;
use crate::errors::AppError;
use crate::interview::score_transcript;
use crate::jobs::handlers::fetch_job;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::scoring::ResumeEvaluation;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobIdQuery {
    pub job_id: Uuid,
}

/// POST /api/v1/applications
///
/// Multipart intake: `job_id`, `user_id`, optional `detail` (a JSON object —
/// anything else is rejected, never evaluated), and the `resume` file.
/// The resume is scored exactly once, here, through the configured scorer.
pub async fn handle_submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut job_id: Option<Uuid> = None;
    let mut user_id: Option<Uuid> = None;
    let mut detail: Option<Value> = None;
    let mut resume: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_id" => job_id = Some(parse_uuid_field(field, "job_id").await?),
            "user_id" => user_id = Some(parse_uuid_field(field, "user_id").await?),
            "detail" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable detail field: {e}")))?;
                let value: Value = serde_json::from_str(&text)
                    .map_err(|e| AppError::Validation(format!("detail is not valid JSON: {e}")))?;
                if !value.is_object() {
                    return Err(AppError::Validation(
                        "detail must be a JSON object".to_string(),
                    ));
                }
                detail = Some(value);
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("unreadable resume upload: {e}")))?;
                resume = Some((filename, content_type, data));
            }
            _ => {}
        }
    }

    let job_id = job_id.ok_or_else(|| AppError::Validation("job_id is required".to_string()))?;
    let user_id = user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    let (filename, content_type, data) =
        resume.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let job = fetch_job(&state.db, job_id).await?;

    // A resume we cannot read still produces a rankable application.
    let resume_text = extract_text(&data, &content_type);
    let evaluation = match resume_text.as_deref() {
        Some(text) if !text.trim().is_empty() => state.scorer.score(text, &job).await,
        _ => ResumeEvaluation {
            resume_score: 0.0,
            detail: json!({ "error": "no text could be extracted from the resume" }),
        },
    };

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO applications (id, job_id, user_id, resume_filename, resume_content_type,
                                   resume_file, resume_text, resume_detail, score_detail,
                                   resume_score, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(id)
    .bind(job_id)
    .bind(user_id)
    .bind(&filename)
    .bind(&content_type)
    .bind(&data[..])
    .bind(&resume_text)
    .bind(detail.unwrap_or_else(|| json!({})))
    .bind(&evaluation.detail)
    .bind(evaluation.resume_score)
    .bind(ApplicationStatus::Applied.as_str())
    .execute(&state.db)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
            "this candidate has already applied to this job".to_string(),
        ),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::Validation("unknown job_id or user_id".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(Json(json!({
        "message": "Job application submitted",
        "id": id,
        "resume_score": evaluation.resume_score,
    })))
}

/// GET /api/v1/applications?job_id=...
///
/// Lists a job's applications; the raw resume bytes are withheld.
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<JobIdQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let applications = sqlx::query_as::<_, ApplicationRow>(
        "SELECT id, job_id, user_id, resume_filename, resume_content_type, resume_text,
                resume_detail, score_detail, resume_score, technical_score, status, applied_at
         FROM applications
         WHERE job_id = $1
         ORDER BY applied_at",
    )
    .bind(params.job_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(applications))
}

/// GET /api/v1/applications/:id/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let row = sqlx::query_as::<_, (Vec<u8>, String, String)>(
        "SELECT resume_file, resume_filename, resume_content_type
         FROM applications WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume for application {id} not found")))?;

    let (file, filename, content_type) = row;
    let headers = [
        (header::CONTENT_TYPE, content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, file).into_response())
}

#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    pub transcript: String,
}

/// POST /api/v1/applications/:id/transcript
///
/// Scores an interview transcript and persists it as the application's
/// technical score. The scorer itself never fails; a degraded transcript
/// simply scores zero with explanatory feedback.
pub async fn handle_score_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TranscriptRequest>,
) -> Result<Json<Value>, AppError> {
    let result = score_transcript(&state.llm, &req.transcript).await;

    let updated = sqlx::query("UPDATE applications SET technical_score = $1 WHERE id = $2")
        .bind(result.score)
        .bind(id)
        .execute(&state.db)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Application {id} not found")));
    }

    Ok(Json(json!({
        "application_id": id,
        "score": result.score,
        "feedback": result.feedback,
    })))
}

async fn parse_uuid_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<Uuid, AppError> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("unreadable {name} field: {e}")))?;
    text.trim()
        .parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("{name} must be a valid UUID")))
}
