//! Descriptive tags and their display form.

use serde::{Deserialize, Serialize};

/// A content tag with the service's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, e.g. `person`.
    pub name: String,
    /// Confidence from 0.0 to 1.0.
    pub confidence: f64,
}

impl Tag {
    /// Creates a tag.
    #[must_use]
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }

    /// Renders the tag as `Name: <name>, Confidence: <confidence>`.
    ///
    /// The confidence is printed in the shortest form that round-trips,
    /// so `0.8` stays `0.8` and `1.0` stays `1.0`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("Name: {}, Confidence: {:?}", self.name, self.confidence)
    }
}

/// Ordered tags for one image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(pub Vec<Tag>);

impl TagSet {
    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags in service order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Formats every tag for display, preserving order.
#[must_use]
pub fn format_tags(tags: &TagSet) -> Vec<String> {
    tags.iter().map(Tag::display).collect()
}
