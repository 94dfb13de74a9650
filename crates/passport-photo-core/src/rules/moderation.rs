use crate::domain::{CheckOutcome, ModerationResult};

/// Passes when every content safety category has severity zero.
#[must_use]
pub fn moderation(result: &ModerationResult) -> CheckOutcome {
    let flagged: Vec<String> = result
        .flagged()
        .map(|(category, severity)| format!("{}: {severity}", category.label()))
        .collect();
    if flagged.is_empty() {
        CheckOutcome::pass("Moderation test passed")
    } else {
        CheckOutcome::fail(format!(
            "Moderation test failed. Results: {}",
            flagged.join(", ")
        ))
    }
}
