//! Checks on categorical face attributes reported by the face service.

use super::Thresholds;
use crate::domain::{
    BlurLevel, CheckOutcome, DetectedFace, ExposureLevel, MaskType, RecognitionQuality,
};

/// Passes only for high recognition quality.
#[must_use]
pub fn recognition_quality(face: &DetectedFace) -> CheckOutcome {
    match face.attributes.quality {
        RecognitionQuality::High => CheckOutcome::pass("Recognition quality is high."),
        RecognitionQuality::Medium => CheckOutcome::fail(
            "Recognition quality is medium; a higher quality image is recommended.",
        ),
        RecognitionQuality::Low => CheckOutcome::fail(
            "Recognition quality is low; the image is not suitable for identity.",
        ),
    }
}

/// Passes only for good face exposure.
#[must_use]
pub fn exposure(face: &DetectedFace) -> CheckOutcome {
    match face.attributes.exposure {
        ExposureLevel::GoodExposure => CheckOutcome::pass("Good exposure level detected."),
        level => CheckOutcome::fail(format!("Exposure level issue detected: {level}.")),
    }
}

/// Passes when both yaw and roll are within their limits.
#[must_use]
pub fn head_orientation(face: &DetectedFace, thresholds: &Thresholds) -> CheckOutcome {
    let pose = face.attributes.head_pose;
    if pose.yaw.abs() <= thresholds.max_yaw && pose.roll.abs() <= thresholds.max_roll {
        CheckOutcome::pass(format!(
            "Head orientation is within limits (Yaw: {:.1}, Roll: {:.1}).",
            pose.yaw, pose.roll
        ))
    } else {
        CheckOutcome::fail(format!(
            "Head orientation outside acceptable range (Yaw: {:.1}, Roll: {:.1}).",
            pose.yaw, pose.roll
        ))
    }
}

/// Reports the blur level. Never fails: a high blur level is reported as
/// ignored so existing clients keep their verdicts.
#[must_use]
pub fn blur(face: &DetectedFace) -> CheckOutcome {
    match face.attributes.blur {
        BlurLevel::Low => CheckOutcome::pass("Blur test passed. Blur level is low."),
        BlurLevel::Medium => CheckOutcome::pass("Blur test passed. Blur level is medium."),
        BlurLevel::High => CheckOutcome::pass(
            "Blur test ignored. Blur level is high; the image is too blurry.",
        ),
    }
}

/// Passes when nothing covers the face.
#[must_use]
pub fn mask(face: &DetectedFace) -> CheckOutcome {
    match face.attributes.mask {
        MaskType::NoMask => CheckOutcome::pass("Mask test passed. No mask detected."),
        other => CheckOutcome::fail(format!("Mask test failed. Detected mask type: {other}.")),
    }
}

/// Fails when the eyes, forehead or mouth are occluded.
#[must_use]
pub fn occlusion(face: &DetectedFace) -> CheckOutcome {
    let regions = face.attributes.occlusion.occluded_regions();
    if regions.is_empty() {
        CheckOutcome::pass("Occlusion test passed. No occlusions detected.")
    } else {
        CheckOutcome::fail(format!(
            "Occlusion test failed. Occlusions: {}.",
            regions.join(",")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FaceRectangle, Occlusion};
    use crate::rules::fixtures;

    fn face() -> DetectedFace {
        fixtures::face(FaceRectangle::new(0, 0, 10, 10))
    }

    #[test]
    fn test_recognition_quality_levels() {
        let mut face = face();
        let high = recognition_quality(&face);
        assert!(high.passed);
        assert_eq!(high.message, "Recognition quality is high.");

        face.attributes.quality = RecognitionQuality::Medium;
        let medium = recognition_quality(&face);
        assert!(!medium.passed);
        assert!(medium.message.contains("medium"));

        face.attributes.quality = RecognitionQuality::Low;
        let low = recognition_quality(&face);
        assert!(!low.passed);
        assert_eq!(
            low.message,
            "Recognition quality is low; the image is not suitable for identity."
        );
    }

    #[test]
    fn test_exposure_names_the_level() {
        let mut face = face();
        assert!(exposure(&face).passed);

        face.attributes.exposure = ExposureLevel::OverExposure;
        let outcome = exposure(&face);
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Exposure level issue detected: overExposure.");
    }

    #[test]
    fn test_head_orientation_boundaries() {
        let thresholds = Thresholds::default();
        let mut face = face();

        face.attributes.head_pose.yaw = -15.0;
        face.attributes.head_pose.roll = 15.0;
        let outcome = head_orientation(&face, &thresholds);
        assert!(outcome.passed);
        assert_eq!(
            outcome.message,
            "Head orientation is within limits (Yaw: -15.0, Roll: 15.0)."
        );

        face.attributes.head_pose.roll = 15.2;
        let outcome = head_orientation(&face, &thresholds);
        assert!(!outcome.passed);
        assert_eq!(
            outcome.message,
            "Head orientation outside acceptable range (Yaw: -15.0, Roll: 15.2)."
        );
    }

    #[test]
    fn test_high_blur_passes_as_ignored() {
        let mut face = face();
        face.attributes.blur = BlurLevel::High;
        let outcome = blur(&face);
        assert!(outcome.passed);
        assert!(outcome.message.contains("ignored"));
    }

    #[test]
    fn test_blur_messages_are_distinct() {
        let mut face = face();
        let low = blur(&face).message;
        face.attributes.blur = BlurLevel::Medium;
        let medium = blur(&face).message;
        assert_ne!(low, medium);
        assert_eq!(medium, "Blur test passed. Blur level is medium.");
    }

    #[test]
    fn test_mask_failure_names_type() {
        let mut face = face();
        assert_eq!(mask(&face).message, "Mask test passed. No mask detected.");

        face.attributes.mask = MaskType::FaceMask;
        let outcome = mask(&face);
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Mask test failed. Detected mask type: faceMask.");
    }

    #[test]
    fn test_occlusion_lists_regions() {
        let mut face = face();
        assert!(occlusion(&face).passed);

        face.attributes.occlusion = Occlusion {
            eye_occluded: true,
            forehead_occluded: false,
            mouth_occluded: true,
        };
        let outcome = occlusion(&face);
        assert!(!outcome.passed);
        assert_eq!(outcome.message, "Occlusion test failed. Occlusions: eye,mouth.");
    }

    #[test]
    fn test_occlusion_all_regions() {
        let mut face = face();
        face.attributes.occlusion = Occlusion {
            eye_occluded: true,
            forehead_occluded: true,
            mouth_occluded: true,
        };
        assert_eq!(
            occlusion(&face).message,
            "Occlusion test failed. Occlusions: eye,forehead,mouth."
        );
    }
}
