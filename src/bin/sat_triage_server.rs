//! Satellite triage HTTP server
//!
//! Accepts image uploads on `/analyze`, asks the vision provider to describe
//! them, and returns the triage decision.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sat_triage::api::{create_app, ApiState};
use sat_triage::{AnalysisService, AppConfig, GeminiVisionClient, ResultLog, TriageEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sat_triage=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting satellite triage server");

    let config = AppConfig::from_env()?;
    let api_key = config.require_api_key()?.to_string();

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let vision = GeminiVisionClient::with_model(api_key, &config.model);
    let engine = TriageEngine::new(config.triage.clone());
    let policy = &engine.config().policy;
    tracing::info!(
        research_severity = policy.research_severity,
        research_area = policy.research_area,
        negligible = policy.negligible,
        "Triage thresholds loaded"
    );
    let mut service = AnalysisService::new(Arc::new(vision), engine);
    match &config.result_log_path {
        Some(path) => {
            tracing::info!("Appending decisions to {}", path.display());
            service = service.with_result_log(ResultLog::new(path.clone()));
        }
        None => tracing::info!("Result log disabled"),
    }

    let state = ApiState::new(service, config.upload_dir.clone());
    let app = create_app(state, config.max_upload_bytes);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server is running on {} (model {})", addr, config.model);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
