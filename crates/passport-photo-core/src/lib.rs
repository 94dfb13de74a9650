//! Passport Photo Core - Domain logic and rule evaluators
//!
//! This crate contains the domain types, the image loader, the eleven
//! passport-photo checks and the analysis pipeline. Perception services are
//! reached only through the traits in [`ports`].

pub mod analyser;
pub mod domain;
pub mod error;
pub mod ports;
pub mod rules;

pub use analyser::{Analysis, PhotoAnalyser};
pub use domain::{
    format_tags, AnalysisReport, CheckOutcome, DetectedFace, FaceDetection, ImageDimensions,
    ModerationResult, PhotoImage, PhotoRecord, Tag, TagSet,
};
pub use error::{AnalysisError, GatewayError, ImageLoadError, PreconditionError};
pub use ports::{
    ContentModerator, FaceDetector, Gateways, ImageSource, ImageTagger, ProgressEvent,
    ProgressSink, ResultOutput,
};
pub use rules::{Check, CheckResult, Thresholds};
