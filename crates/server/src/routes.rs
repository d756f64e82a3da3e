//! Router and request handlers

use crate::error::PredictError;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    response::Json,
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use doodle_core::WordSampler;
use image::DynamicImage;
use llm_bridge::VisionClassifier;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

pub struct AppState {
    pub sampler: WordSampler,
    pub classifier: VisionClassifier,
}

impl AppState {
    pub fn new(sampler: WordSampler, classifier: VisionClassifier) -> Self {
        Self {
            sampler,
            classifier,
        }
    }
}

/// Build the router; static files are served from `static_dir` when given
///
/// `max_body_bytes` caps request bodies, replacing axum's 2 MB default so
/// large drawings still reach `/predict`.
pub fn create_app(
    state: Arc<AppState>,
    static_dir: Option<&Path>,
    max_body_bytes: usize,
) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/random-word", get(random_word))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn random_word(State(state): State<Arc<AppState>>) -> Json<WordResponse> {
    let word = state.sampler.next_word();
    tracing::debug!(word = %word, "Issued drawing prompt");
    Json(WordResponse { word })
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let request_id = uuid::Uuid::new_v4();
    classify_upload(&state, payload)
        .instrument(tracing::info_span!("predict", %request_id))
        .await
}

async fn classify_upload(
    state: &AppState,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, PredictError> {
    let Json(request) = payload.map_err(|e| PredictError::BadRequest(e.body_text()))?;
    let image = decode_data_url(&request.image)?;
    let label = state.classifier.classify_label(image).await;
    Ok(Json(PredictResponse { label }))
}

/// Decode a `<header>,<base64>` data URL into an RGB image
///
/// Only the text after the first comma is used; the header is not
/// inspected, the image format is sniffed from the bytes.
pub fn decode_data_url(data_url: &str) -> Result<DynamicImage, PredictError> {
    let (_header, encoded) = data_url
        .split_once(',')
        .ok_or(PredictError::MissingSeparator)?;
    let bytes = general_purpose::STANDARD.decode(encoded.trim())?;
    let image = image::load_from_memory(&bytes)?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub image: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WordResponse {
    pub word: String,
}
