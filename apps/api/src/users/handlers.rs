use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{HrRow, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<Value>, AppError> {
    let id = insert_account(&state, "users", &req).await?;
    Ok(Json(json!({ "message": "User created", "id": id })))
}

/// GET /api/v1/users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserRow>>, AppError> {
    let users = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, created_at FROM users ORDER BY created_at",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(users))
}

/// POST /api/v1/hr
pub async fn handle_create_hr(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Json<Value>, AppError> {
    let id = insert_account(&state, "hr_users", &req).await?;
    Ok(Json(json!({ "message": "HR created", "id": id })))
}

/// GET /api/v1/hr
pub async fn handle_list_hr(State(state): State<AppState>) -> Result<Json<Vec<HrRow>>, AppError> {
    let hrs = sqlx::query_as::<_, HrRow>(
        "SELECT id, name, email, created_at FROM hr_users ORDER BY created_at",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(hrs))
}

async fn insert_account(
    state: &AppState,
    table: &str,
    req: &CreateAccountRequest,
) -> Result<Uuid, AppError> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::Validation("a valid email is required".to_string()));
    }

    let id = Uuid::new_v4();
    let sql = format!("INSERT INTO {table} (id, name, email, password) VALUES ($1, $2, $3, $4)");
    sqlx::query(&sql)
        .bind(id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.password)
        .execute(&state.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("an account with email {} already exists", req.email))
            }
            _ => AppError::Database(e),
        })?;
    Ok(id)
}
