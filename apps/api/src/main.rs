mod applications;
mod config;
mod db;
mod errors;
mod interview;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod notify;
mod routes;
mod scoring;
mod selection;
mod state;
mod users;
mod workflow;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::LlmClient;
use crate::notify::SmtpNotifier;
use crate::routes::build_router;
use crate::scoring::embedding::{Embedder, HttpEmbedder};
use crate::scoring::{LabelSimilarityScorer, LlmResumeScorer, ResumeScorer};
use crate::selection::store::PgApplicationStore;
use crate::state::AppState;
use crate::workflow::{StageContext, WorkflowScheduler};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("hireflow_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hireflow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Optional sentence-embedding collaborator for semantic blending
    let embedder: Option<Arc<dyn Embedder>> = config
        .embeddings_url
        .clone()
        .map(|url| Arc::new(HttpEmbedder::new(url)) as Arc<dyn Embedder>);
    if embedder.is_some() {
        info!("Semantic blending enabled");
    }

    // Resume scorer: label similarity by default, LLM matcher when enabled
    let scorer: Arc<dyn ResumeScorer> = if config.use_llm_scorer {
        info!("Resume scorer: LLM matcher");
        Arc::new(LlmResumeScorer::new(llm.clone()))
    } else {
        info!("Resume scorer: label similarity");
        Arc::new(LabelSimilarityScorer::new(embedder))
    };

    // Stage workflow driver and its collaborators
    let notifier = Arc::new(SmtpNotifier::new(
        db.clone(),
        &config.smtp_host,
        config.smtp_port,
        &config.smtp_user,
        &config.smtp_pass,
    )?);
    let store = Arc::new(PgApplicationStore::new(db.clone()));
    let scheduler = WorkflowScheduler::new(StageContext {
        store,
        notifier,
        resume_select_pct: config.resume_select_pct,
        hr_select_pct: config.hr_select_pct,
    });

    // Build app state
    let state = AppState {
        db,
        llm,
        scorer,
        scheduler,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
