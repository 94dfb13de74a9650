//! Azure Face detection client.

use passport_photo_core::domain::{
    BlurLevel, ExposureLevel, FaceDetection, FaceRectangle, HeadPose, MaskType, Occlusion,
    RecognitionQuality,
};
use passport_photo_core::{FaceDetector, GatewayError};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::debug;

use super::client::{join_url, parse_json, HttpClient, KEY_HEADER};

const SERVICE: &str = "face";

/// Detection request: model versions plus every attribute the rule
/// evaluators read.
const DETECT_PATH: &str = "face/v1.0/detect?detectionModel=detection_03\
    &recognitionModel=recognition_04&returnFaceId=false\
    &returnFaceAttributes=qualityForRecognition,exposure,headPose,occlusion,blur,mask";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFace {
    face_rectangle: WireRectangle,
    #[serde(default)]
    face_attributes: WireAttributes,
}

#[derive(Debug, Deserialize)]
struct WireRectangle {
    top: u32,
    left: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAttributes {
    quality_for_recognition: Option<WireQuality>,
    exposure: Option<WireExposure>,
    head_pose: Option<WireHeadPose>,
    blur: Option<WireBlur>,
    mask: Option<WireMask>,
    occlusion: Option<WireOcclusion>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireQuality {
    Low,
    Medium,
    High,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireExposure {
    exposure_level: WireExposureLevel,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireExposureLevel {
    UnderExposure,
    GoodExposure,
    OverExposure,
}

#[derive(Debug, Deserialize)]
struct WireHeadPose {
    pitch: f64,
    roll: f64,
    yaw: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlur {
    blur_level: WireBlurLevel,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireBlurLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Deserialize)]
struct WireMask {
    #[serde(rename = "type")]
    kind: WireMaskType,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireMaskType {
    NoMask,
    FaceMask,
    OtherMaskOrOcclusion,
    Uncertain,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOcclusion {
    forehead_occluded: bool,
    eye_occluded: bool,
    mouth_occluded: bool,
}

impl From<WireQuality> for RecognitionQuality {
    fn from(wire: WireQuality) -> Self {
        match wire {
            WireQuality::Low => Self::Low,
            WireQuality::Medium => Self::Medium,
            WireQuality::High => Self::High,
        }
    }
}

impl From<WireExposureLevel> for ExposureLevel {
    fn from(wire: WireExposureLevel) -> Self {
        match wire {
            WireExposureLevel::UnderExposure => Self::UnderExposure,
            WireExposureLevel::GoodExposure => Self::GoodExposure,
            WireExposureLevel::OverExposure => Self::OverExposure,
        }
    }
}

impl From<WireBlurLevel> for BlurLevel {
    fn from(wire: WireBlurLevel) -> Self {
        match wire {
            WireBlurLevel::Low => Self::Low,
            WireBlurLevel::Medium => Self::Medium,
            WireBlurLevel::High => Self::High,
        }
    }
}

impl From<WireMaskType> for MaskType {
    fn from(wire: WireMaskType) -> Self {
        match wire {
            WireMaskType::NoMask => Self::NoMask,
            WireMaskType::FaceMask => Self::FaceMask,
            WireMaskType::OtherMaskOrOcclusion => Self::OtherMaskOrOcclusion,
            WireMaskType::Uncertain => Self::Uncertain,
        }
    }
}

impl From<WireFace> for FaceDetection {
    fn from(wire: WireFace) -> Self {
        let rect = wire.face_rectangle;
        let attrs = wire.face_attributes;
        Self {
            rectangle: FaceRectangle::new(rect.left, rect.top, rect.width, rect.height),
            quality: attrs.quality_for_recognition.map(Into::into),
            exposure: attrs.exposure.map(|e| e.exposure_level.into()),
            head_pose: attrs.head_pose.map(|p| HeadPose {
                yaw: p.yaw,
                roll: p.roll,
                pitch: p.pitch,
            }),
            blur: attrs.blur.map(|b| b.blur_level.into()),
            mask: attrs.mask.map(|m| m.kind.into()),
            occlusion: attrs.occlusion.map(|o| Occlusion {
                eye_occluded: o.eye_occluded,
                forehead_occluded: o.forehead_occluded,
                mouth_occluded: o.mouth_occluded,
            }),
        }
    }
}

/// Client for the Azure Face `detect` operation.
#[derive(Debug, Clone)]
pub struct AzureFaceClient {
    http: HttpClient,
    url: String,
    key: String,
}

impl AzureFaceClient {
    /// Creates a client for the resource at `endpoint`.
    #[must_use]
    pub fn new(http: HttpClient, endpoint: &str, key: impl Into<String>) -> Self {
        Self {
            http,
            url: join_url(endpoint, DETECT_PATH),
            key: key.into(),
        }
    }
}

impl FaceDetector for AzureFaceClient {
    fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceDetection>, GatewayError> {
        let response = self.http.send(SERVICE, |client| {
            client
                .post(&self.url)
                .header(KEY_HEADER, &self.key)
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(image.to_vec())
        })?;
        let faces: Vec<WireFace> = parse_json(SERVICE, response)?;
        debug!(count = faces.len(), "faces detected");
        Ok(faces.into_iter().map(FaceDetection::from).collect())
    }
}
