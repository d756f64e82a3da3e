//! Generative model interface and response types

use async_trait::async_trait;
use doodle_core::{ClassifyError, FinishReason};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Decoding parameters sent with every generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    /// Low-diversity decoding with a short output cap, biased towards a
    /// single-word answer
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.8,
            top_k: 20,
            max_output_tokens: 20,
        }
    }
}

/// A multimodal model that completes a text prompt about an image
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: &RgbImage,
        config: &GenerationConfig,
    ) -> Result<GenerateResponse, ClassifyError>;
}

/// Raw model reply, before any normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateResponse {
    /// Single candidate carrying `text`
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content::from_text(text)),
                finish_reason: Some(FinishReason::Stop),
            }],
            prompt_feedback: None,
        }
    }

    /// Single candidate with no content, stopped for `reason`
    pub fn stopped(reason: FinishReason) -> Self {
        Self {
            candidates: vec![Candidate {
                content: None,
                finish_reason: Some(reason),
            }],
            prompt_feedback: None,
        }
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
    }
}

/// Feedback on the prompt itself, present when the whole request was blocked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.into()),
            }],
            role: Some("model".to_string()),
        }
    }
}

/// One segment of candidate content; non-text segments carry no `text`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}
