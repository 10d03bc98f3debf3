//! Updates produced by a live activity source and applied by the dashboard.

use serde::Serialize;

use crate::model::Activity;

/// New presence flags for one roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceChange {
    pub user_id: String,
    pub online: bool,
    pub editing: bool,
}

/// Everything that happened on one generator tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickOutcome {
    /// Activity to prepend to the feed, if one was synthesized.
    pub activity: Option<Activity>,
    /// Presence updates; empty when presence was left alone.
    pub presence: Vec<PresenceChange>,
}

impl TickOutcome {
    /// True when applying this outcome would change nothing.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.activity.is_none() && self.presence.is_empty()
    }
}
