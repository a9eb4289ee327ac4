use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Required variables fail startup; optional ones fall back to defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Also used as the From address on outbound mail.
    pub smtp_user: String,
    pub smtp_pass: String,
    /// Sentence-embeddings endpoint. Absent → semantic blending disabled.
    pub embeddings_url: Option<String>,
    /// Swap the label-similarity scorer for the LLM matcher at intake.
    pub use_llm_scorer: bool,
    /// Fraction of applicants that survive the resume stage, in (0, 1].
    pub resume_select_pct: f64,
    /// Fraction of the coding-round cohort shortlisted for HR, in (0, 1].
    pub hr_select_pct: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            smtp_host: require_env("SMTP_HOST")?,
            smtp_port: std::env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse::<u16>()
                .context("SMTP_PORT must be a valid port number")?,
            smtp_user: require_env("SMTP_USER")?,
            smtp_pass: require_env("SMTP_PASS")?,
            embeddings_url: std::env::var("EMBEDDINGS_URL").ok().filter(|v| !v.is_empty()),
            use_llm_scorer: std::env::var("ENABLE_LLM_SCORING")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            resume_select_pct: percentage_env("SELECT_RESUME_PCT", 0.5)?,
            hr_select_pct: percentage_env("SELECT_HR_PCT", 0.5)?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn percentage_env(key: &str, default: f64) -> Result<f64> {
    let value = match std::env::var(key) {
        Ok(raw) => raw
            .parse::<f64>()
            .with_context(|| format!("{key} must be a number"))?,
        Err(_) => default,
    };
    if !(value > 0.0 && value <= 1.0) {
        bail!("{key} must be in (0, 1], got {value}");
    }
    Ok(value)
}
