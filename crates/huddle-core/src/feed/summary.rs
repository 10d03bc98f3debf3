//! Per-type tallies for the activity summary chart.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{Activity, ActivityType};

/// Count of activities per [`ActivityType`]. All four types are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub edit: usize,
    pub comment: usize,
    pub mention: usize,
    pub upload: usize,
}

impl TypeSummary {
    #[must_use]
    pub const fn count(&self, kind: ActivityType) -> usize {
        match kind {
            ActivityType::Edit => self.edit,
            ActivityType::Comment => self.comment,
            ActivityType::Mention => self.mention,
            ActivityType::Upload => self.upload,
        }
    }

    /// Sum of all four counts.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.edit + self.comment + self.mention + self.upload
    }

    /// Share of `kind` in `[0, 1]`. The denominator is at least one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, kind: ActivityType) -> f64 {
        let total = self.total().max(1);
        self.count(kind) as f64 / total as f64
    }

    /// `(type, count)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ActivityType, usize)> + '_ {
        ActivityType::ALL.into_iter().map(|kind| (kind, self.count(kind)))
    }

    const fn slot_mut(&mut self, kind: ActivityType) -> &mut usize {
        match kind {
            ActivityType::Edit => &mut self.edit,
            ActivityType::Comment => &mut self.comment,
            ActivityType::Mention => &mut self.mention,
            ActivityType::Upload => &mut self.upload,
        }
    }
}

/// Tally `activities` by type.
#[must_use]
pub fn summarize(activities: &[Arc<Activity>]) -> TypeSummary {
    let mut summary = TypeSummary::default();
    for activity in activities {
        *summary.slot_mut(activity.kind) += 1;
    }
    summary
}

/// Maps a type's share of the feed to a bar size.
///
/// Size is `min + ratio * span`, so every bar stays visible and an empty
/// feed yields minimum-size bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarScale {
    pub min: f64,
    pub span: f64,
}

impl Default for BarScale {
    fn default() -> Self {
        Self {
            min: 16.0,
            span: 48.0,
        }
    }
}

impl BarScale {
    #[must_use]
    pub fn size(&self, summary: &TypeSummary, kind: ActivityType) -> f64 {
        self.span.mul_add(summary.ratio(kind), self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use chrono::Utc;

    fn feed(kinds: &[ActivityType]) -> Vec<Arc<Activity>> {
        let user = Arc::new(User::new("u1", "Alice", ""));
        kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                Arc::new(Activity::new(
                    format!("a{i}"),
                    Arc::clone(&user),
                    *kind,
                    Utc::now(),
                    "",
                ))
            })
            .collect()
    }

    #[test]
    fn counts_cover_all_types() {
        let summary = summarize(&feed(&[
            ActivityType::Edit,
            ActivityType::Edit,
            ActivityType::Upload,
        ]));
        assert_eq!(summary.edit, 2);
        assert_eq!(summary.comment, 0);
        assert_eq!(summary.mention, 0);
        assert_eq!(summary.upload, 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.iter().count(), 4);
    }

    #[test]
    fn empty_feed_yields_minimum_bars() {
        let summary = summarize(&[]);
        let scale = BarScale::default();
        for kind in ActivityType::ALL {
            assert!((scale.size(&summary, kind) - 16.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn bar_size_grows_with_share() {
        let summary = summarize(&feed(&[ActivityType::Comment, ActivityType::Comment]));
        let scale = BarScale::default();
        assert!((scale.size(&summary, ActivityType::Comment) - 64.0).abs() < f64::EPSILON);
        assert!(scale.size(&summary, ActivityType::Comment) > scale.size(&summary, ActivityType::Edit));
    }
}
