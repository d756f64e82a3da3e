//! Core types shared by the sampler, the classification gateway and the
//! HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Label returned whenever no confident single-word guess is available
pub const UNKNOWN_LABEL: &str = "unknown";

/// Why a generation stopped, as reported by the external model service
///
/// Deserialized from the service's string codes. Codes this build does not
/// know about land in [`FinishReason::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    FinishReasonUnspecified,
    /// Natural stop point
    Stop,
    /// Output token cap reached
    MaxTokens,
    /// Blocked by the safety filter
    Safety,
    /// Blocked for reciting training data
    Recitation,
    /// Blocked for an unspecified reason
    Other,
    Language,
    Blocklist,
    ProhibitedContent,
    Spii,
    MalformedFunctionCall,
    ImageSafety,
    #[serde(other)]
    Unknown,
}

impl FinishReason {
    /// True when the candidate was withheld by a content filter and its
    /// text must not be surfaced as a label
    pub fn is_filtered(self) -> bool {
        matches!(
            self,
            FinishReason::Safety
                | FinishReason::Recitation
                | FinishReason::Other
                | FinishReason::Blocklist
                | FinishReason::ProhibitedContent
                | FinishReason::Spii
                | FinishReason::ImageSafety
        )
    }
}

/// The service answered, but not with a usable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InconclusiveReason {
    /// No candidate outputs at all
    NoCandidates,
    /// Top candidate was stopped by a content filter
    Filtered(FinishReason),
    /// Top candidate carried no text in its first part
    EmptyText,
}

impl fmt::Display for InconclusiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InconclusiveReason::NoCandidates => write!(f, "no candidates returned"),
            InconclusiveReason::Filtered(reason) => write!(f, "blocked ({:?})", reason),
            InconclusiveReason::EmptyText => write!(f, "no text in response"),
        }
    }
}

/// Failure anywhere between preprocessing and parsing the service reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("preprocessing failed: {0}")]
    Preprocess(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("request to model service failed: {0}")]
    Request(String),

    #[error("model service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse model response: {0}")]
    Parse(String),

    #[error("model service did not answer within {0:?}")]
    Timeout(Duration),
}

/// Outcome of classifying one drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Normalized single-word guess
    Label(String),
    /// The service responded without a usable label
    Inconclusive(InconclusiveReason),
    /// The call or its preparation failed
    Failed(ClassifyError),
}

impl Classification {
    /// Label to show the player; the sentinel for anything but a success
    pub fn label(&self) -> &str {
        match self {
            Classification::Label(label) => label,
            _ => UNKNOWN_LABEL,
        }
    }

    pub fn into_label(self) -> String {
        match self {
            Classification::Label(label) => label,
            _ => UNKNOWN_LABEL.to_string(),
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Classification::Label(_))
    }
}
