//! Server configuration

use anyhow::{Context, Result};
use llm_bridge::GeminiConfig;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_CLASSIFY_TIMEOUT_SECS: u64 = 30;
/// 64 MiB, comfortably above any canvas data URL
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Everything the server needs at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served at `/`
    pub static_dir: PathBuf,
    /// Upper bound on one model call
    pub classify_timeout: Duration,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    pub gemini: GeminiConfig,
}

impl ServerConfig {
    /// Create config from environment variables
    ///
    /// Fails when the model API key is missing so the process never starts
    /// without a way to classify.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut gemini = GeminiConfig::from_lookup(&lookup)?;

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", value))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("CLASSIFY_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().with_context(|| {
                format!("CLASSIFY_TIMEOUT_SECS must be whole seconds, got {:?}", value)
            })?,
            None => DEFAULT_CLASSIFY_TIMEOUT_SECS,
        };
        gemini.timeout_secs = timeout_secs;

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("MAX_BODY_BYTES must be a byte count, got {:?}", value))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            classify_timeout: Duration::from_secs(timeout_secs),
            max_body_bytes,
            gemini,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
