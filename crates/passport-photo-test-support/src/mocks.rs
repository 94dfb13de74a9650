//! Mock implementations of core port traits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use passport_photo_core::domain::{
    FaceDetection, ModerationResult, PhotoImage, PhotoRecord, Tag, TagSet,
};
use passport_photo_core::ports::{
    ContentModerator, FaceDetector, Gateways, ImageSource, ImageTagger, ProgressEvent,
    ProgressSink, ResultOutput,
};
use passport_photo_core::GatewayError;

/// Scripted answer of a mock gateway.
#[derive(Debug, Clone)]
enum Reply<T> {
    Ok(T),
    Status(u16),
}

impl<T: Clone> Reply<T> {
    fn get(&self, service: &'static str) -> Result<T, GatewayError> {
        match self {
            Self::Ok(value) => Ok(value.clone()),
            Self::Status(status) => Err(GatewayError::Status {
                service,
                status: *status,
                body: "mock failure".into(),
            }),
        }
    }
}

/// Mock implementation of `FaceDetector`.
///
/// Returns the configured faces and counts calls.
pub struct MockFaceDetector {
    reply: Reply<Vec<FaceDetection>>,
    calls: AtomicUsize,
}

impl MockFaceDetector {
    /// Returns `faces` on every call.
    #[must_use]
    pub const fn new(faces: Vec<FaceDetection>) -> Self {
        Self {
            reply: Reply::Ok(faces),
            calls: AtomicUsize::new(0),
        }
    }

    /// Finds no face.
    #[must_use]
    pub const fn no_face() -> Self {
        Self::new(Vec::new())
    }

    /// Fails every call with HTTP `status`.
    #[must_use]
    pub const fn failing(status: u16) -> Self {
        Self {
            reply: Reply::Status(status),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FaceDetector for MockFaceDetector {
    fn detect_faces(&self, _image: &[u8]) -> Result<Vec<FaceDetection>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.get("face")
    }
}

/// Mock implementation of `ContentModerator`.
pub struct MockContentModerator {
    reply: Reply<ModerationResult>,
    calls: AtomicUsize,
}

impl MockContentModerator {
    /// Returns `result` on every call.
    #[must_use]
    pub const fn new(result: ModerationResult) -> Self {
        Self {
            reply: Reply::Ok(result),
            calls: AtomicUsize::new(0),
        }
    }

    /// Reports every category as safe.
    #[must_use]
    pub fn clean() -> Self {
        Self::new(ModerationResult::default())
    }

    /// Fails every call with HTTP `status`.
    #[must_use]
    pub const fn failing(status: u16) -> Self {
        Self {
            reply: Reply::Status(status),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContentModerator for MockContentModerator {
    fn analyze_image(&self, _image: &[u8]) -> Result<ModerationResult, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.get("moderation")
    }
}

/// Mock implementation of `ImageTagger`.
pub struct MockImageTagger {
    reply: Reply<TagSet>,
    calls: AtomicUsize,
}

impl MockImageTagger {
    /// Returns `tags` on every call.
    #[must_use]
    pub fn new(tags: impl IntoIterator<Item = (&'static str, f64)>) -> Self {
        Self {
            reply: Reply::Ok(tags.into_iter().map(|(n, c)| Tag::new(n, c)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns no tags.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            reply: Reply::Ok(TagSet::default()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with HTTP `status`.
    #[must_use]
    pub const fn failing(status: u16) -> Self {
        Self {
            reply: Reply::Status(status),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageTagger for MockImageTagger {
    fn tag_image(&self, _image: &[u8]) -> Result<TagSet, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.get("vision")
    }
}

/// The three mock gateways, kept typed so tests can read their counters.
#[derive(Clone)]
pub struct MockGateways {
    /// Face detector.
    pub faces: Arc<MockFaceDetector>,
    /// Content moderator.
    pub moderation: Arc<MockContentModerator>,
    /// Image tagger.
    pub tags: Arc<MockImageTagger>,
}

impl MockGateways {
    /// Bundles the given mocks.
    #[must_use]
    pub fn new(
        faces: MockFaceDetector,
        moderation: MockContentModerator,
        tags: MockImageTagger,
    ) -> Self {
        Self {
            faces: Arc::new(faces),
            moderation: Arc::new(moderation),
            tags: Arc::new(tags),
        }
    }

    /// One face with the given detection, clean moderation and a single
    /// `person` tag.
    #[must_use]
    pub fn with_face(face: FaceDetection) -> Self {
        Self::new(
            MockFaceDetector::new(vec![face]),
            MockContentModerator::clean(),
            MockImageTagger::new([("person", 0.99)]),
        )
    }

    /// No face found; moderation and tagging would succeed if called.
    #[must_use]
    pub fn without_face() -> Self {
        Self::new(
            MockFaceDetector::no_face(),
            MockContentModerator::clean(),
            MockImageTagger::new([("wall", 0.9)]),
        )
    }

    /// Trait-object view for the analyser.
    #[must_use]
    pub fn gateways(&self) -> Gateways {
        Gateways::new(
            Arc::clone(&self.faces) as Arc<dyn FaceDetector>,
            Arc::clone(&self.moderation) as Arc<dyn ContentModerator>,
            Arc::clone(&self.tags) as Arc<dyn ImageTagger>,
        )
    }
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built photos and tracks iteration for assertions.
pub struct MockImageSource {
    images: Vec<PhotoImage>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given photos.
    #[must_use]
    pub fn new(images: Vec<PhotoImage>) -> Self {
        Self {
            images,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoImage>> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Box::new(self.images.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.images.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures records for later assertions.
pub struct MockResultOutput {
    records: Arc<Mutex<Vec<PhotoRecord>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured records.
    #[must_use]
    pub fn records(&self) -> Vec<PhotoRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, record: &PhotoRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Completed { .. }))
            .count()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use passport_photo_core::domain::{AnalysisReport, ImageDimensions};

    #[test]
    fn test_mock_gateways_count_calls() {
        let mocks = MockGateways::without_face();
        let gateways = mocks.gateways();

        assert!(gateways.faces.detect_faces(b"img").unwrap().is_empty());
        assert_eq!(mocks.faces.calls(), 1);
        assert_eq!(mocks.moderation.calls(), 0);
        assert_eq!(mocks.tags.calls(), 0);
    }

    #[test]
    fn test_failing_mock_names_service() {
        let tagger = MockImageTagger::failing(503);
        let err = tagger.tag_image(b"img").unwrap_err();
        assert_eq!(err.service(), "vision");
        assert!(matches!(err, GatewayError::Status { status: 503, .. }));
    }

    #[test]
    fn test_mock_image_source() {
        let source = MockImageSource::new(vec![crate::SyntheticImageBuilder::uniform_gray(
            4, 4, 100,
        )]);
        assert_eq!(source.count_hint(), Some(1));
        assert_eq!(source.images().count(), 1);
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_result_output() {
        let output = MockResultOutput::new();
        let record = PhotoRecord {
            path: "test.jpg".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            dimensions: ImageDimensions::new(100, 100),
            results: AnalysisReport::no_face(),
            checks: vec![],
            tags: vec![],
        };

        output.write(&record).unwrap();
        output.flush().unwrap();

        assert_eq!(output.records().len(), 1);
        assert_eq!(output.records()[0].path, "test.jpg");
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();
        sink.on_event(ProgressEvent::Skipped {
            path: "bad.jpg".into(),
            reason: "decode".into(),
        });
        sink.on_event(ProgressEvent::Finished {
            processed: 0,
            skipped: 1,
        });

        assert_eq!(sink.skipped_count(), 1);
        assert_eq!(sink.finished_counts(), Some((0, 1)));
    }
}
