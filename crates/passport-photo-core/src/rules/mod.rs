//! Rule evaluators.
//!
//! Every check is a pure function of the selected face, the image pixels,
//! the moderation severities and the configured thresholds. [`Check::ALL`]
//! fixes the order in which they run and report.

mod attributes;
mod geometry;
mod moderation;
mod pixels;

use serde::{Deserialize, Serialize};

use crate::domain::{CheckOutcome, DetectedFace, ModerationResult, PhotoImage};

pub use attributes::{blur, exposure, head_orientation, mask, occlusion, recognition_quality};
pub use geometry::{face_position, face_size};
pub use moderation::moderation;
pub use pixels::{lighting, neutral_background};

/// Default threshold values.
pub mod defaults {
    /// Minimum face area as a fraction of the image area.
    pub const MIN_FACE_AREA_RATIO: f64 = 0.10;
    /// Maximum face-center offset as a fraction of the image dimension.
    pub const POSITION_TOLERANCE_RATIO: f64 = 0.10;
    /// Minimum mean grayscale brightness.
    pub const MIN_BRIGHTNESS: f64 = 100.0;
    /// Maximum mean grayscale brightness.
    pub const MAX_BRIGHTNESS: f64 = 200.0;
    /// Maximum grayscale standard deviation of the background.
    pub const MAX_BACKGROUND_STDDEV: f64 = 60.0;
    /// Maximum absolute head yaw in degrees.
    pub const MAX_YAW: f64 = 15.0;
    /// Maximum absolute head roll in degrees.
    pub const MAX_ROLL: f64 = 15.0;
}

/// Tunable limits used by the evaluators. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum face area ÷ image area.
    pub min_face_area_ratio: f64,
    /// Maximum face-center offset ÷ image width (horizontal) or height (vertical).
    pub position_tolerance_ratio: f64,
    /// Minimum mean brightness (0-255).
    pub min_brightness: f64,
    /// Maximum mean brightness (0-255).
    pub max_brightness: f64,
    /// Maximum background standard deviation (0-255 scale).
    pub max_background_stddev: f64,
    /// Maximum absolute yaw in degrees.
    pub max_yaw: f64,
    /// Maximum absolute roll in degrees.
    pub max_roll: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_face_area_ratio: defaults::MIN_FACE_AREA_RATIO,
            position_tolerance_ratio: defaults::POSITION_TOLERANCE_RATIO,
            min_brightness: defaults::MIN_BRIGHTNESS,
            max_brightness: defaults::MAX_BRIGHTNESS,
            max_background_stddev: defaults::MAX_BACKGROUND_STDDEV,
            max_yaw: defaults::MAX_YAW,
            max_roll: defaults::MAX_ROLL,
        }
    }
}

/// Everything an evaluator may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The face under evaluation.
    pub face: &'a DetectedFace,
    /// The photo's pixels.
    pub image: &'a PhotoImage,
    /// Content safety severities for the photo.
    pub moderation: &'a ModerationResult,
    /// Configured limits.
    pub thresholds: &'a Thresholds,
}

/// Identifies one of the rule evaluators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Face is suitable for recognition.
    RecognitionQuality,
    /// Face is large enough.
    FaceSize,
    /// Face is centered.
    FacePosition,
    /// Overall image brightness.
    Lighting,
    /// Face exposure attribute.
    Exposure,
    /// Head yaw and roll.
    HeadOrientation,
    /// Background uniformity.
    NeutralBackground,
    /// Face blur attribute.
    Blur,
    /// Face covering.
    Mask,
    /// Occluded face regions.
    Occlusion,
    /// Unsafe content.
    Moderation,
}

impl Check {
    /// Every check, in evaluation order.
    pub const ALL: [Self; 11] = [
        Self::RecognitionQuality,
        Self::FaceSize,
        Self::FacePosition,
        Self::Lighting,
        Self::Exposure,
        Self::HeadOrientation,
        Self::NeutralBackground,
        Self::Blur,
        Self::Mask,
        Self::Occlusion,
        Self::Moderation,
    ];

    /// Short identifier used in logs and output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RecognitionQuality => "recognition_quality",
            Self::FaceSize => "face_size",
            Self::FacePosition => "face_position",
            Self::Lighting => "lighting",
            Self::Exposure => "exposure",
            Self::HeadOrientation => "head_orientation",
            Self::NeutralBackground => "neutral_background",
            Self::Blur => "blur",
            Self::Mask => "mask",
            Self::Occlusion => "occlusion",
            Self::Moderation => "moderation",
        }
    }

    /// Runs this check.
    #[must_use]
    pub fn evaluate(self, ctx: &RuleContext<'_>) -> CheckOutcome {
        let face = ctx.face;
        let thresholds = ctx.thresholds;
        match self {
            Self::RecognitionQuality => recognition_quality(face),
            Self::FaceSize => face_size(face, ctx.image, thresholds),
            Self::FacePosition => face_position(face, ctx.image, thresholds),
            Self::Lighting => lighting(ctx.image, thresholds),
            Self::Exposure => exposure(face),
            Self::HeadOrientation => head_orientation(face, thresholds),
            Self::NeutralBackground => neutral_background(face, ctx.image, thresholds),
            Self::Blur => blur(face),
            Self::Mask => mask(face),
            Self::Occlusion => occlusion(face),
            Self::Moderation => moderation(ctx.moderation),
        }
    }
}

/// A check together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Which check ran.
    pub check: Check,
    /// What it concluded.
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

/// Runs every check in order. No check is skipped because another failed.
#[must_use]
pub fn evaluate_all(ctx: &RuleContext<'_>) -> Vec<CheckResult> {
    Check::ALL
        .into_iter()
        .map(|check| CheckResult {
            check,
            outcome: check.evaluate(ctx),
        })
        .collect()
}
