//! The analysis pipeline: face detection, rule evaluation and tagging.

use tracing::{debug, error, info};

use crate::domain::{AnalysisReport, DetectedFace, PhotoImage, TagSet};
use crate::error::AnalysisError;
use crate::ports::Gateways;
use crate::rules::{evaluate_all, CheckResult, RuleContext, Thresholds};

/// Outcome of analysing one photo.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Overall verdict and one message per check.
    pub report: AnalysisReport,
    /// Named outcome of each check. Empty when no face was found.
    pub checks: Vec<CheckResult>,
    /// Descriptive tags. Empty when no face was found.
    pub tags: TagSet,
}

impl Analysis {
    fn no_face() -> Self {
        Self {
            report: AnalysisReport::no_face(),
            checks: Vec::new(),
            tags: TagSet::default(),
        }
    }
}

/// Runs the full check pipeline against injected perception gateways.
///
/// Holds no per-request state; one instance is shared by every request.
#[derive(Debug, Clone)]
pub struct PhotoAnalyser {
    gateways: Gateways,
    thresholds: Thresholds,
}

impl PhotoAnalyser {
    /// Creates an analyser.
    #[must_use]
    pub const fn new(gateways: Gateways, thresholds: Thresholds) -> Self {
        Self {
            gateways,
            thresholds,
        }
    }

    /// Configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Analyses one photo.
    ///
    /// Calls the face service first. Without a face the result is a single
    /// failing message and neither moderation nor tagging is requested.
    /// Otherwise the first face is checked by every evaluator, then the
    /// photo is moderated and tagged.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Gateway`] if any service call fails, and
    /// [`AnalysisError::Precondition`] if the first face lacks an attribute
    /// the evaluators need.
    pub fn analyse(&self, image: &PhotoImage) -> Result<Analysis, AnalysisError> {
        let source = image.source();
        let bytes = image.encoded();

        let detections = self.gateways.faces.detect_faces(bytes)?;
        let face_count = detections.len();
        let Some(first) = detections.into_iter().next() else {
            info!(%source, "no face detected");
            return Ok(Analysis::no_face());
        };
        if face_count > 1 {
            debug!(%source, face_count, "multiple faces detected, using the first");
        }

        let face = DetectedFace::try_from(first).map_err(|err| {
            error!(%source, %err, "face record is incomplete");
            err
        })?;

        let moderation = self.gateways.moderation.analyze_image(bytes)?;

        let ctx = RuleContext {
            face: &face,
            image,
            moderation: &moderation,
            thresholds: &self.thresholds,
        };
        let checks = evaluate_all(&ctx);
        for result in &checks {
            debug!(
                %source,
                check = result.check.name(),
                passed = result.outcome.passed,
                message = %result.outcome.message,
            );
        }

        let tags = self.gateways.tags.tag_image(bytes)?;

        let report = AnalysisReport::from_outcomes(checks.iter().map(|r| &r.outcome));
        info!(%source, status = report.status, tags = tags.len(), "analysis complete");

        Ok(Analysis {
            report,
            checks,
            tags,
        })
    }
}
