//! Vision classification of player drawings

use crate::model::{GenerateResponse, GenerationConfig, GenerativeModel};
use doodle_core::preprocess::preprocess_image;
use doodle_core::{Classification, ClassifyError, InconclusiveReason};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Duration;

/// Instruction sent alongside every drawing
pub const DOODLE_PROMPT: &str = concat!(
    "Look at this simple doodle drawing and identify what object it shows. ",
    "Give me just one word for the main object you see. ",
    "Examples: cat, car, house, tree, ball, etc."
);

/// Default bound on a single model call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Turns a drawing into a single lowercase guess
///
/// Never fails: every problem between preprocessing and parsing the model
/// reply ends up as a non-label [`Classification`], which renders as the
/// `"unknown"` sentinel.
#[derive(Clone)]
pub struct VisionClassifier {
    model: Arc<dyn GenerativeModel>,
    config: GenerationConfig,
    timeout: Duration,
}

impl VisionClassifier {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            model,
            config: GenerationConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Classify a decoded drawing
    pub async fn classify(&self, image: DynamicImage) -> Classification {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "Classifying drawing"
        );

        let prepared = match tokio::task::spawn_blocking(move || preprocess_image(&image)).await {
            Ok(prepared) => prepared,
            Err(e) => {
                let outcome = Classification::Failed(ClassifyError::Preprocess(e.to_string()));
                log_outcome(&outcome, None);
                return outcome;
            }
        };

        let call = self.model.generate(DOODLE_PROMPT, &prepared, &self.config);
        let (outcome, block_reason) = match tokio::time::timeout(self.timeout, call).await {
            Err(_) => (
                Classification::Failed(ClassifyError::Timeout(self.timeout)),
                None,
            ),
            Ok(Err(e)) => (Classification::Failed(e), None),
            Ok(Ok(response)) => (
                normalize_response(&response),
                response.block_reason().map(str::to_string),
            ),
        };

        log_outcome(&outcome, block_reason.as_deref());
        outcome
    }

    /// Classify and collapse the outcome to the label shown to the player
    pub async fn classify_label(&self, image: DynamicImage) -> String {
        self.classify(image).await.into_label()
    }
}

/// Reduce a raw model reply to a label or an inconclusive reason
pub fn normalize_response(response: &GenerateResponse) -> Classification {
    let Some(candidate) = response.candidates.first() else {
        return Classification::Inconclusive(InconclusiveReason::NoCandidates);
    };

    if let Some(reason) = candidate.finish_reason {
        if reason.is_filtered() {
            return Classification::Inconclusive(InconclusiveReason::Filtered(reason));
        }
    }

    let text = candidate
        .content
        .as_ref()
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.as_deref())
        .map(str::trim)
        // Blank text is reported as inconclusive rather than an empty label
        .filter(|text| !text.is_empty());

    match text {
        Some(text) => Classification::Label(text.to_lowercase()),
        None => Classification::Inconclusive(InconclusiveReason::EmptyText),
    }
}

fn log_outcome(outcome: &Classification, block_reason: Option<&str>) {
    match outcome {
        Classification::Label(label) => tracing::info!(label = %label, "Drawing classified"),
        Classification::Inconclusive(reason) => tracing::warn!(
            reason = %reason,
            block_reason = block_reason.unwrap_or("none"),
            "No usable label in model response, returning default"
        ),
        Classification::Failed(e) => {
            tracing::error!(error = %e, "Classification failed, returning default")
        }
    }
}
