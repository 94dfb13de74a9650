//! Checks on where the face box sits in the frame.

use super::Thresholds;
use crate::domain::{CheckOutcome, DetectedFace, PhotoImage};

/// Passes when the face box covers at least the configured share of the image.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn face_size(face: &DetectedFace, image: &PhotoImage, thresholds: &Thresholds) -> CheckOutcome {
    let ratio = face.rectangle.area() as f64 / image.dimensions().area() as f64;
    let percent = ratio * 100.0;
    if ratio >= thresholds.min_face_area_ratio {
        CheckOutcome::pass(format!("Face occupies {percent:.2}% of the image area."))
    } else {
        CheckOutcome::fail(format!("Face area ratio is too small: {percent:.2}%."))
    }
}

/// Passes when the face-box center is within tolerance of the image center
/// on both axes.
#[must_use]
pub fn face_position(
    face: &DetectedFace,
    image: &PhotoImage,
    thresholds: &Thresholds,
) -> CheckOutcome {
    let width = f64::from(image.width());
    let height = f64::from(image.height());
    let (face_x, face_y) = face.rectangle.center();
    let x_offset = (width / 2.0 - face_x).abs();
    let y_offset = (height / 2.0 - face_y).abs();

    let tolerance = thresholds.position_tolerance_ratio;
    if x_offset <= width * tolerance && y_offset <= height * tolerance {
        CheckOutcome::pass("Face is well-centered.")
    } else {
        CheckOutcome::fail(format!(
            "Face position deviates by {x_offset:.1}px horizontally and {y_offset:.1}px vertically."
        ))
    }
}
