//! Face records produced by the face detection service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PreconditionError;

/// Axis-aligned face bounding box in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRectangle {
    /// X coordinate of the left edge.
    pub left: u32,
    /// Y coordinate of the top edge.
    pub top: u32,
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl FaceRectangle {
    /// Creates a rectangle from its left/top corner and size.
    #[must_use]
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Area in square pixels.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Center point as floating-point pixel coordinates.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.left) + f64::from(self.width) / 2.0,
            f64::from(self.top) + f64::from(self.height) / 2.0,
        )
    }

    /// Whether the pixel at (`x`, `y`) lies on or inside the box.
    ///
    /// The right and bottom edges (`left + width`, `top + height`) count as
    /// inside, matching a filled rectangle drawn between both corners.
    #[must_use]
    pub const fn covers(&self, x: u32, y: u32) -> bool {
        x >= self.left
            && y >= self.top
            && x as u64 <= self.left as u64 + self.width as u64
            && y as u64 <= self.top as u64 + self.height as u64
    }
}

/// How usable the face is for identity recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionQuality {
    /// Not suitable for identity.
    Low,
    /// Usable, but a better image is recommended.
    Medium,
    /// Suitable for identity.
    High,
}

/// Exposure of the face region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureLevel {
    /// Face is too dark.
    UnderExposure,
    /// Face is well lit.
    GoodExposure,
    /// Face is too bright.
    OverExposure,
}

impl fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnderExposure => "underExposure",
            Self::GoodExposure => "goodExposure",
            Self::OverExposure => "overExposure",
        })
    }
}

/// Blur of the face region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurLevel {
    /// Sharp.
    Low,
    /// Slightly soft.
    Medium,
    /// Too blurry.
    High,
}

/// Face covering detected over nose and mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskType {
    /// Nothing covers the face.
    NoMask,
    /// A face mask.
    FaceMask,
    /// Some other covering.
    OtherMaskOrOcclusion,
    /// The service could not tell.
    Uncertain,
}

impl fmt::Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoMask => "noMask",
            Self::FaceMask => "faceMask",
            Self::OtherMaskOrOcclusion => "otherMaskOrOcclusion",
            Self::Uncertain => "uncertain",
        })
    }
}

/// Head rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadPose {
    /// Rotation around the vertical axis (looking left/right).
    pub yaw: f64,
    /// Tilt towards a shoulder.
    pub roll: f64,
    /// Nodding up/down.
    pub pitch: f64,
}

/// Which face regions are covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Occlusion {
    /// Eyes are covered.
    pub eye_occluded: bool,
    /// Forehead is covered.
    pub forehead_occluded: bool,
    /// Mouth is covered.
    pub mouth_occluded: bool,
}

impl Occlusion {
    /// Names of the covered regions, in eye, forehead, mouth order.
    #[must_use]
    pub fn occluded_regions(&self) -> Vec<&'static str> {
        [
            (self.eye_occluded, "eye"),
            (self.forehead_occluded, "forehead"),
            (self.mouth_occluded, "mouth"),
        ]
        .into_iter()
        .filter_map(|(occluded, name)| occluded.then_some(name))
        .collect()
    }
}

/// One face as reported by the face service.
///
/// Attributes are optional because the service may omit any of them; a
/// [`DetectedFace`] is only built once all of them are present.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceDetection {
    /// Bounding box.
    pub rectangle: FaceRectangle,
    /// Recognition quality category.
    pub quality: Option<RecognitionQuality>,
    /// Exposure category.
    pub exposure: Option<ExposureLevel>,
    /// Head rotation.
    pub head_pose: Option<HeadPose>,
    /// Blur category.
    pub blur: Option<BlurLevel>,
    /// Mask category.
    pub mask: Option<MaskType>,
    /// Occluded regions.
    pub occlusion: Option<Occlusion>,
}

/// Attributes of the face under evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceAttributes {
    /// Recognition quality category.
    pub quality: RecognitionQuality,
    /// Exposure category.
    pub exposure: ExposureLevel,
    /// Head rotation.
    pub head_pose: HeadPose,
    /// Blur category.
    pub blur: BlurLevel,
    /// Mask category.
    pub mask: MaskType,
    /// Occluded regions.
    pub occlusion: Occlusion,
}

/// The single face the rule evaluators run against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedFace {
    /// Bounding box.
    pub rectangle: FaceRectangle,
    /// Fully populated attributes.
    pub attributes: FaceAttributes,
}

fn require<T>(value: Option<T>, attribute: &'static str) -> Result<T, PreconditionError> {
    value.ok_or(PreconditionError { attribute })
}

impl TryFrom<FaceDetection> for DetectedFace {
    type Error = PreconditionError;

    fn try_from(detection: FaceDetection) -> Result<Self, Self::Error> {
        Ok(Self {
            rectangle: detection.rectangle,
            attributes: FaceAttributes {
                quality: require(detection.quality, "qualityForRecognition")?,
                exposure: require(detection.exposure, "exposure")?,
                head_pose: require(detection.head_pose, "headPose")?,
                blur: require(detection.blur, "blur")?,
                mask: require(detection.mask, "mask")?,
                occlusion: require(detection.occlusion, "occlusion")?,
            },
        })
    }
}
