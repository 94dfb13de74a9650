//! Core domain types for passport photo analysis.

mod face;
mod image;
mod moderation;
mod result;
mod stats;
mod tags;

pub use face::{
    BlurLevel, DetectedFace, ExposureLevel, FaceAttributes, FaceDetection, FaceRectangle,
    HeadPose, MaskType, Occlusion, RecognitionQuality,
};
pub use image::{luma_bt601, ImageDimensions, PhotoImage};
pub use moderation::{ModerationCategory, ModerationResult};
pub use result::{AnalysisReport, CheckOutcome, PhotoRecord, NO_FACE_MESSAGE};
pub use stats::{ChannelStats, Histogram};
pub use tags::{format_tags, Tag, TagSet};
