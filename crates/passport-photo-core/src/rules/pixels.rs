//! Checks computed from the image pixels.

use super::Thresholds;
use crate::domain::{CheckOutcome, DetectedFace, PhotoImage};

/// Passes when the mean grayscale brightness lies within the configured range.
#[must_use]
pub fn lighting(image: &PhotoImage, thresholds: &Thresholds) -> CheckOutcome {
    let brightness = image.mean_brightness();
    if brightness < thresholds.min_brightness {
        CheckOutcome::fail(format!("Image is too dark (brightness: {brightness:.1})."))
    } else if brightness > thresholds.max_brightness {
        CheckOutcome::fail(format!("Image is too bright (brightness: {brightness:.1})."))
    } else {
        CheckOutcome::pass(format!("Brightness level is within range: {brightness:.1}."))
    }
}

/// Passes when the grayscale spread of everything outside the face box is low.
///
/// The face box, edges included, is excluded from the statistics rather than
/// counted as black.
#[must_use]
pub fn neutral_background(
    face: &DetectedFace,
    image: &PhotoImage,
    thresholds: &Thresholds,
) -> CheckOutcome {
    let rect = face.rectangle;
    let stats = image.gray_stats(|x, y| !rect.covers(x, y));
    if stats.std_dev <= thresholds.max_background_stddev {
        CheckOutcome::pass("Background is uniform and neutral.")
    } else {
        CheckOutcome::fail(format!(
            "Background variation too high (stddev = {:.2}).",
            stats.std_dev
        ))
    }
}
