mod ai;
mod config;
mod errors;
mod files;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::providers::build_provider;
use crate::ai::{AiService, GenerationSettings};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing provider key or malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the AI provider (wrapped in the canned fallback when degraded mode is on)
    let provider = build_provider(&config)?;
    let ai = AiService::new(provider, GenerationSettings::from(&config));
    info!(
        provider = %ai.provider_kind(),
        model = ai.model(),
        degraded_mode = config.degraded_mode,
        "AI service initialized"
    );

    // Initialize local persistence
    let store = FileResumeStore::open(&config.data_dir)
        .await
        .with_context(|| format!("cannot open data directory {}", config.data_dir.display()))?;
    info!("Resume store at {}", config.data_dir.display());

    let state = AppState {
        ai: Arc::new(ai),
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
