//! Word sampler
//!
//! Hands out drawing prompts at random while steering clear of the words
//! issued most recently:
//! - Candidates are the catalog minus the recency buffer
//! - When fewer than [`MIN_AVAILABLE`] candidates remain, the buffer is cut
//!   back to its newest [`RETAINED_ON_RESET`] entries, or emptied if it
//!   holds no more than that
//! - The buffer holds at most [`RECENT_CAPACITY`] words, oldest evicted first

use crate::catalog;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Maximum number of recently issued words remembered
pub const RECENT_CAPACITY: usize = 10;

/// Below this many candidates the recency buffer is cut back
pub const MIN_AVAILABLE: usize = 5;

/// Newest entries kept when the recency buffer is cut back
pub const RETAINED_ON_RESET: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("word catalog needs at least {required} distinct words, found {found}")]
    CatalogTooSmall { required: usize, found: usize },
}

struct SamplerState {
    recent: VecDeque<String>,
    rng: StdRng,
}

/// Thread-safe random word source with a bounded recency buffer
pub struct WordSampler {
    catalog: Vec<String>,
    state: Mutex<SamplerState>,
}

impl WordSampler {
    /// Create a sampler over `catalog`, seeded from OS entropy
    pub fn new(catalog: Vec<String>) -> Result<Self, SamplerError> {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Create a sampler with a caller-supplied RNG
    ///
    /// The catalog must hold more distinct words than survive a buffer
    /// reset, so that a candidate always exists.
    pub fn with_rng(catalog: Vec<String>, rng: StdRng) -> Result<Self, SamplerError> {
        let distinct = catalog.iter().collect::<HashSet<_>>().len();
        let required = RETAINED_ON_RESET + 1;
        if distinct < required {
            return Err(SamplerError::CatalogTooSmall {
                required,
                found: distinct,
            });
        }

        Ok(Self::build(catalog, rng))
    }

    /// Sampler over the built-in [`catalog::DRAWING_WORDS`]
    pub fn with_default_catalog() -> Self {
        Self::build(catalog::default_catalog(), StdRng::from_entropy())
    }

    fn build(catalog: Vec<String>, rng: StdRng) -> Self {
        Self {
            catalog,
            state: Mutex::new(SamplerState {
                recent: VecDeque::with_capacity(RECENT_CAPACITY + 1),
                rng,
            }),
        }
    }

    /// Pick the next word and record it as recently issued
    pub fn next_word(&self) -> String {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let mut available = self.available(&state.recent);
        if available.len() < MIN_AVAILABLE {
            // A buffer no longer than the retained tail is cleared outright
            let keep = if state.recent.len() > RETAINED_ON_RESET {
                RETAINED_ON_RESET
            } else {
                0
            };
            let evict = state.recent.len() - keep;
            state.recent.drain(..evict);
            tracing::debug!(
                available = available.len(),
                kept = keep,
                "Word pool running low, trimming recency buffer"
            );
            available = self.available(&state.recent);
        }

        // Non-empty: the catalog holds more distinct words than the buffer keeps
        let index = state.rng.gen_range(0..available.len());
        let word = available[index].to_string();

        state.recent.push_back(word.clone());
        if state.recent.len() > RECENT_CAPACITY {
            state.recent.pop_front();
        }

        word
    }

    /// Snapshot of the recency buffer, oldest first
    pub fn recent_words(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.recent.iter().cloned().collect()
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    fn available(&self, recent: &VecDeque<String>) -> Vec<&str> {
        self.catalog
            .iter()
            .filter(|word| !recent.iter().any(|r| r == *word))
            .map(String::as_str)
            .collect()
    }
}

impl Default for WordSampler {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}

impl std::fmt::Debug for WordSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordSampler")
            .field("catalog_len", &self.catalog.len())
            .field("recent", &self.recent_words())
            .finish()
    }
}
