use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the tables on startup if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hr_users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        department TEXT NOT NULL,
        requirements TEXT[] NOT NULL,
        priority_labels TEXT[] NOT NULL DEFAULT '{}',
        problem_statements TEXT[] NOT NULL DEFAULT '{}',
        hr_id UUID NOT NULL,
        posted_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        resume_start TIMESTAMPTZ NOT NULL,
        resume_end TIMESTAMPTZ NOT NULL,
        coding_start TIMESTAMPTZ NOT NULL,
        coding_end TIMESTAMPTZ NOT NULL,
        interview_start TIMESTAMPTZ NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id UUID PRIMARY KEY,
        job_id UUID NOT NULL REFERENCES jobs(id),
        user_id UUID NOT NULL REFERENCES users(id),
        resume_filename TEXT NOT NULL,
        resume_content_type TEXT NOT NULL,
        resume_file BYTEA NOT NULL,
        resume_text TEXT,
        resume_detail JSONB NOT NULL DEFAULT '{}'::jsonb,
        score_detail JSONB NOT NULL DEFAULT '{}'::jsonb,
        resume_score DOUBLE PRECISION NOT NULL DEFAULT 0,
        technical_score DOUBLE PRECISION,
        status TEXT NOT NULL DEFAULT 'applied',
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (job_id, user_id)
    )
    "#,
];
