//! Perception service ports.
//!
//! Each port takes the encoded image bytes exactly as uploaded or read from
//! disk. Implementations are built once at startup and shared across
//! requests, hence the `Send + Sync` bounds.

use std::sync::Arc;

use crate::domain::{FaceDetection, ModerationResult, TagSet};
use crate::error::GatewayError;

/// Detects faces and their attributes.
pub trait FaceDetector: Send + Sync {
    /// Returns every face found, in service order. An empty list means no face.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or answers badly.
    fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceDetection>, GatewayError>;
}

/// Rates an image for unsafe content.
pub trait ContentModerator: Send + Sync {
    /// Returns the severity of each moderation category.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or answers badly.
    fn analyze_image(&self, image: &[u8]) -> Result<ModerationResult, GatewayError>;
}

/// Describes an image with tags.
pub trait ImageTagger: Send + Sync {
    /// Returns descriptive tags in service order.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or answers badly.
    fn tag_image(&self, image: &[u8]) -> Result<TagSet, GatewayError>;
}

/// The three perception services an analysis needs.
#[derive(Clone)]
pub struct Gateways {
    /// Face detection and attributes.
    pub faces: Arc<dyn FaceDetector>,
    /// Content safety.
    pub moderation: Arc<dyn ContentModerator>,
    /// Descriptive tags.
    pub tags: Arc<dyn ImageTagger>,
}

impl Gateways {
    /// Bundles the three gateways.
    #[must_use]
    pub fn new(
        faces: Arc<dyn FaceDetector>,
        moderation: Arc<dyn ContentModerator>,
        tags: Arc<dyn ImageTagger>,
    ) -> Self {
        Self {
            faces,
            moderation,
            tags,
        }
    }
}

impl std::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateways").finish_non_exhaustive()
    }
}
