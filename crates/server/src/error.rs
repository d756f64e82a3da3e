//! Errors raised at the HTTP boundary of `/predict`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Why an uploaded drawing could not be turned into an image
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("image must be a data URL of the form '<header>,<base64 data>'")]
    MissingSeparator,

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Prediction request failed");
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
