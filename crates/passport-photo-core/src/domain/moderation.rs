//! Content safety severities.

use serde::{Deserialize, Serialize};

/// Unsafe-content category reported by the moderation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationCategory {
    /// Hate speech or symbols.
    Hate,
    /// Self-harm.
    SelfHarm,
    /// Sexual content.
    Sexual,
    /// Violence.
    Violence,
}

impl ModerationCategory {
    /// Every category, in reporting order.
    pub const ALL: [Self; 4] = [Self::Hate, Self::SelfHarm, Self::Sexual, Self::Violence];

    /// Label used in check messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hate => "hate",
            Self::SelfHarm => "self harm",
            Self::Sexual => "sexual",
            Self::Violence => "violence",
        }
    }
}

/// Severity per category for one image. Zero means nothing was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModerationResult {
    /// Hate severity.
    pub hate: u32,
    /// Self-harm severity.
    pub self_harm: u32,
    /// Sexual severity.
    pub sexual: u32,
    /// Violence severity.
    pub violence: u32,
}

impl ModerationResult {
    /// Severity recorded for `category`.
    #[must_use]
    pub const fn severity(&self, category: ModerationCategory) -> u32 {
        match category {
            ModerationCategory::Hate => self.hate,
            ModerationCategory::SelfHarm => self.self_harm,
            ModerationCategory::Sexual => self.sexual,
            ModerationCategory::Violence => self.violence,
        }
    }

    /// Sets the severity for `category`.
    pub fn set(&mut self, category: ModerationCategory, severity: u32) {
        match category {
            ModerationCategory::Hate => self.hate = severity,
            ModerationCategory::SelfHarm => self.self_harm = severity,
            ModerationCategory::Sexual => self.sexual = severity,
            ModerationCategory::Violence => self.violence = severity,
        }
    }

    /// Categories with a non-zero severity, in reporting order.
    pub fn flagged(&self) -> impl Iterator<Item = (ModerationCategory, u32)> + '_ {
        ModerationCategory::ALL
            .into_iter()
            .map(|category| (category, self.severity(category)))
            .filter(|&(_, severity)| severity > 0)
    }
}
