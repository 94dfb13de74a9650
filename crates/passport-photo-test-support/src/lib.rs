//! Test support utilities for passport-photo.
//!
//! Provides mock gateways, port mocks and synthetic builders for testing
//! the analysis pipeline without network access.
//!
//! # Example
//!
//! ```
//! use passport_photo_core::{PhotoAnalyser, Thresholds};
//! use passport_photo_test_support::{FaceBuilder, MockGateways, SyntheticImageBuilder};
//!
//! let mocks = MockGateways::with_face(FaceBuilder::passing().build());
//! let analyser = PhotoAnalyser::new(mocks.gateways(), Thresholds::default());
//! let analysis = analyser.analyse(&SyntheticImageBuilder::passport_photo()).unwrap();
//! assert!(analysis.report.status);
//! ```

mod builders;
mod mocks;

pub use builders::{FaceBuilder, SyntheticImageBuilder};
pub use mocks::{
    MockContentModerator, MockFaceDetector, MockGateways, MockImageSource, MockImageTagger,
    MockProgressSink, MockResultOutput,
};
