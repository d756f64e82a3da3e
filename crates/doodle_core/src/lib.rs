//! Core pipeline for doodle-guess
//!
//! This crate provides the word catalog and sampler that hand out drawing
//! prompts, the preprocessing applied to a player's drawing before it is
//! shown to a vision model, and the result types shared with the model
//! bridge and the HTTP server.

pub mod catalog;
pub mod preprocess;
pub mod types;
pub mod words;

pub use catalog::{default_catalog, DRAWING_WORDS};
pub use types::*;
pub use words::{SamplerError, WordSampler};
