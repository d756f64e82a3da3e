//! doodle-guess REST API server
//!
//! Serves drawing prompts and classifies submitted drawings through the
//! configured vision model.

pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::PredictError;
pub use routes::{create_app, decode_data_url, AppState};

use anyhow::{Context, Result};
use doodle_core::WordSampler;
use llm_bridge::{GeminiClient, VisionClassifier};
use std::sync::Arc;

/// Build the production state and serve until Ctrl-C
pub async fn serve(config: ServerConfig) -> Result<()> {
    let client = GeminiClient::new(config.gemini.clone())?;
    tracing::info!(model = client.model(), "Using Gemini model");

    let classifier =
        VisionClassifier::new(Arc::new(client)).with_timeout(config.classify_timeout);
    tracing::info!(
        timeout = ?classifier.timeout(),
        max_body_bytes = config.max_body_bytes,
        "Classification limits"
    );
    let state = Arc::new(AppState::new(WordSampler::with_default_catalog(), classifier));

    let static_dir = config.static_dir.is_dir().then_some(config.static_dir.as_path());
    if static_dir.is_none() {
        tracing::warn!(
            dir = %config.static_dir.display(),
            "Static directory not found, only the API will be served"
        );
    }
    let app = create_app(state, static_dir, config.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
