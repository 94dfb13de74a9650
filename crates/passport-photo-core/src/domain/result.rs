//! Check outcomes and analysis reports.

use serde::{Deserialize, Serialize};

use super::ImageDimensions;
use crate::rules::CheckResult;

/// Message reported when the face service finds no face.
pub const NO_FACE_MESSAGE: &str = "No face detected. Ensure a clear, single face in the image.";

/// Result of one rule evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Whether the check passed.
    pub passed: bool,
    /// Human-readable explanation.
    pub message: String,
}

impl CheckOutcome {
    /// A passing outcome.
    #[must_use]
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    /// A failing outcome.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Overall verdict for one photo.
///
/// `status` is true only when a face was found and every check passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Overall pass/fail.
    pub status: bool,
    /// One message per check, in evaluation order.
    pub messages: Vec<String>,
}

impl AnalysisReport {
    /// Report for a photo without a detectable face.
    #[must_use]
    pub fn no_face() -> Self {
        Self {
            status: false,
            messages: vec![NO_FACE_MESSAGE.to_string()],
        }
    }

    /// Aggregates outcomes: status is the AND of all of them.
    #[must_use]
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a CheckOutcome>) -> Self {
        let mut status = true;
        let mut messages = Vec::new();
        for outcome in outcomes {
            status &= outcome.passed;
            messages.push(outcome.message.clone());
        }
        Self { status, messages }
    }
}

/// Complete `check` output for a single image file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Path to the analyzed image.
    pub path: String,
    /// Timestamp of analysis (ISO 8601).
    pub timestamp: String,
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Overall verdict and messages.
    pub results: AnalysisReport,
    /// Named outcome of each check; empty when no face was found.
    pub checks: Vec<CheckResult>,
    /// Formatted descriptive tags.
    pub tags: Vec<String>,
}
