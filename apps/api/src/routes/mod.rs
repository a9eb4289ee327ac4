pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::jobs::handlers as jobs;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route(
            "/api/v1/hr",
            post(users::handle_create_hr).get(users::handle_list_hr),
        )
        .route(
            "/api/v1/users",
            post(users::handle_create_user).get(users::handle_list_users),
        )
        // Jobs and their workflow
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/v1/jobs/:id/schedule", post(jobs::handle_schedule_job))
        .route("/api/v1/jobs/:id/questions", get(jobs::handle_job_questions))
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handle_submit).get(applications::handle_list),
        )
        .route(
            "/api/v1/applications/:id/resume",
            get(applications::handle_download_resume),
        )
        .route(
            "/api/v1/applications/:id/transcript",
            post(applications::handle_score_transcript),
        )
        .with_state(state)
}
