//! Gemini API client
//!
//! Sends a prompt plus one inline PNG to Google's `generateContent`
//! endpoint and returns the raw candidates.

use crate::model::{GenerateResponse, GenerationConfig, GenerativeModel};
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use doodle_core::preprocess::encode_png;
use doodle_core::ClassifyError;
use image::RgbImage;
use serde::Serialize;
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Public Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for Gemini API client
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for Google Gemini
    pub api_key: String,
    /// Model to use (default: gemini-2.0-flash)
    pub model: String,
    /// API root, overridable for testing against a local stand-in
    pub base_url: String,
    /// Timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Create config from environment variables
    ///
    /// Reads `GOOGLE_API_KEY`, falling back to `GEMINI_API_KEY`. `GEMINI_MODEL`
    /// and `GEMINI_BASE_URL` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GOOGLE_API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .context("GOOGLE_API_KEY (or GEMINI_API_KEY) environment variable not set")?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Gemini API client
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { config, client })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: &RgbImage,
        config: &GenerationConfig,
    ) -> Result<GenerateResponse, ClassifyError> {
        let owned = image.clone();
        let png = tokio::task::spawn_blocking(move || encode_png(&owned))
            .await
            .map_err(|e| ClassifyError::Encode(e.to_string()))?
            .map_err(|e| ClassifyError::Encode(e.to_string()))?;
        let request = GeminiRequest::new(prompt, &png, *config);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifyError::Timeout(Duration::from_secs(self.config.timeout_secs))
                } else {
                    ClassifyError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClassifyError::Request(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| ClassifyError::Parse(e.to_string()))
    }
}

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

impl GeminiRequest {
    fn new(prompt: &str, png: &[u8], generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text {
                        text: prompt.to_string(),
                    },
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: general_purpose::STANDARD.encode(png),
                        },
                    },
                ],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "http://localhost:9999/v1beta/".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_gemini_config_new() {
        let config = GeminiConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_gemini_config_from_lookup() {
        let config = GeminiConfig::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("fallback-key".to_string()),
            "GEMINI_MODEL" => Some("gemini-2.5-flash".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_key, "fallback-key");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_gemini_config_prefers_google_api_key() {
        let config = GeminiConfig::from_lookup(|key| match key {
            "GOOGLE_API_KEY" => Some("primary".to_string()),
            "GEMINI_API_KEY" => Some("fallback".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_key, "primary");
    }

    #[test]
    fn test_gemini_config_requires_key() {
        let err = GeminiConfig::from_lookup(|_| None).unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));

        let blank = GeminiConfig::from_lookup(|key| {
            (key == "GOOGLE_API_KEY").then(|| "   ".to_string())
        });
        assert!(blank.is_err());
    }

    #[test]
    fn test_gemini_config_debug_hides_key() {
        let debug = format!("{:?}", test_config());
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("gemini-2.0-flash"));
    }

    #[test]
    fn test_gemini_client_creation() {
        let client = GeminiClient::new(test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(test_config()).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_request_serialization() {
        let request = GeminiRequest::new("what is this?", b"png", GenerationConfig::default());
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "what is this?");
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(
            parts[1]["inline_data"]["data"],
            general_purpose::STANDARD.encode(b"png")
        );
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 20);
    }
}
