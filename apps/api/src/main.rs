use anyhow::Context;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod errors;
mod extraction;
mod generation;
mod llm_client;
mod models;
mod report;
mod routes;
mod selections;
mod state;
mod storage;

use config::Config;
use llm_client::LlmClient;
use report::scorer::default_scorer;
use state::AppState;
use storage::AssessmentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Tracing targets use the underscored crate name
            let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{crate_name}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting auditor API v{}", env!("CARGO_PKG_VERSION"));

    let store = AssessmentStore::new(&config.assessments_dir)
        .context("failed to initialize assessment storage")?;
    info!("Assessment store ready at {}", config.assessments_dir.display());

    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let port = config.port;

    let state = AppState::new(llm, store, default_scorer());
    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("auditor-api listening on {addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
