//! Document outline shown beside the feed, and section-jump emphasis.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a jumped-to section stays emphasized.
pub const EMPHASIS_MILLIS: i64 = 1_200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub label: String,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ordered list of document regions an activity can point at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentOutline {
    sections: Vec<Section>,
}

impl DocumentOutline {
    #[must_use]
    pub const fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    #[must_use]
    pub fn find(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Zero-based position of `section_id` in the outline.
    #[must_use]
    pub fn position(&self, section_id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == section_id)
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

/// Transient highlight on a section after a jump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEmphasis {
    pub section_id: String,
    pub until: DateTime<Utc>,
}

impl SectionEmphasis {
    #[must_use]
    pub fn starting_at(section_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            section_id: section_id.to_string(),
            until: now + Duration::milliseconds(EMPHASIS_MILLIS),
        }
    }

    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.until
    }
}
