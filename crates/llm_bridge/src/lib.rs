//! LLM Bridge for Gemini integration
//!
//! Connects the drawing game to a hosted multimodal model. The model sits
//! behind the [`GenerativeModel`] trait so the classification gateway can
//! be exercised without network access; [`GeminiClient`] is the production
//! implementation.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod gemini;
pub mod model;
pub mod vision;

pub use gemini::{GeminiClient, GeminiConfig};
pub use model::{GenerateResponse, GenerationConfig, GenerativeModel};
pub use vision::{normalize_response, VisionClassifier, DOODLE_PROMPT};
