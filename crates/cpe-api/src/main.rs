//! # cpe-api: Binary Entry Point
//!
//! Loads engine configuration from the environment, builds the engine and
//! serves it over HTTP (default port 8080).
//!
//! `LOG_FORMAT=json` switches the log output to JSON lines.

use cpe_api::state::{AppConfig, AppState};
use cpe_engine::{ComplianceEngine, EngineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let engine_config = EngineConfig::from_env().map_err(|e| {
        tracing::error!("engine configuration invalid: {e}");
        e
    })?;
    if engine_config.classifier.is_none() {
        tracing::warn!(
            "CPE_CLASSIFIER_URL not set: content that clears the fast path will fail closed"
        );
    }

    let mut config = AppConfig::from_lookup(|key| std::env::var(key).ok());
    config.packs_dir = engine_config.packs_dir.clone();
    let port = config.port;

    let engine = ComplianceEngine::from_config(&engine_config).map_err(|e| {
        tracing::error!("engine startup failed: {e}");
        e
    })?;
    let store = engine.registry().snapshot();
    let prohibited: Vec<&str> = engine.denylist().iter().map(|j| j.as_str()).collect();
    tracing::info!(
        packs = store.len(),
        active = store.active_len(),
        classifier = engine.classifier().is_configured(),
        prohibited = ?prohibited,
        "compliance engine ready"
    );

    let app = cpe_api::app(AppState::new(engine, config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("content policy API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
