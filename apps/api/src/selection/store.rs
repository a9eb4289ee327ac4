//! Persistence seam for the selector.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, ApplicationSummary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The narrow persistence contract the selector depends on. Production runs
/// on PostgreSQL; tests use an in-memory implementation.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// All applications for one job, ordered by submission time (ascending).
    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationSummary>, StoreError>;

    /// Bulk status write; returns the number of rows updated.
    async fn batch_update_status(
        &self,
        ids: &[Uuid],
        status: ApplicationStatus,
    ) -> Result<u64, StoreError>;
}

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationSummary>, StoreError> {
        let rows = sqlx::query_as::<_, ApplicationSummary>(
            "SELECT id, user_id, resume_score, status
             FROM applications
             WHERE job_id = $1
             ORDER BY applied_at ASC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn batch_update_status(
        &self,
        ids: &[Uuid],
        status: ApplicationStatus,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE applications SET status = $1 WHERE id = ANY($2)")
            .bind(status.as_str())
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
