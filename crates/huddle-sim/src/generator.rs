//! Mock activity generator.
//!
//! Each [`MockGenerator::tick`] makes two independent draws: whether to
//! synthesize a new activity, and whether to reshuffle roster presence.
//! The generator keeps its own copy of the roster so presence flips are
//! computed against the flags it last handed out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use huddle_core::config::GeneratorConfig;
use huddle_core::live::{PresenceChange, TickOutcome};
use huddle_core::model::{Activity, ActivityType, User};
use tracing::{debug, trace};

use crate::rng::RandomSource;

/// Sections a generated activity may point at.
pub const TARGET_SECTIONS: [&str; 3] = ["section-overview", "section-details", "section-conclusion"];

/// Section names quoted by generated edits.
pub const EDITED_SECTIONS: [&str; 3] = ["Overview", "Details", "Conclusion"];

/// Preview attached to generated uploads.
pub const UPLOAD_PREVIEW: &str = "/uploads/reference-image.png";

pub struct MockGenerator<R> {
    config: GeneratorConfig,
    rng: R,
    roster: Vec<Arc<User>>,
    last_id_millis: Option<i64>,
    ticks: u64,
}

impl<R> std::fmt::Debug for MockGenerator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerator")
            .field("config", &self.config)
            .field("roster", &self.roster.len())
            .field("last_id_millis", &self.last_id_millis)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl<R: RandomSource> MockGenerator<R> {
    #[must_use]
    pub const fn new(config: GeneratorConfig, rng: R, roster: Vec<Arc<User>>) -> Self {
        Self {
            config,
            rng,
            roster,
            last_id_millis: None,
            ticks: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// The roster as the generator currently sees it.
    #[must_use]
    pub fn roster(&self) -> &[Arc<User>] {
        &self.roster
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick at wall time `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        self.ticks = self.ticks.saturating_add(1);

        let activity = if self.rng.hit_rate_percent(self.config.activity_percent) {
            self.synthesize(now)
        } else {
            None
        };

        let presence = if self.rng.hit_rate_percent(self.config.presence_percent) {
            self.reshuffle_presence()
        } else {
            Vec::new()
        };

        trace!(
            tick = self.ticks,
            activity = activity.is_some(),
            presence = presence.len(),
            "generator tick"
        );
        TickOutcome { activity, presence }
    }

    fn synthesize(&mut self, now: DateTime<Utc>) -> Option<Activity> {
        let Some(user) = self.rng.pick(&self.roster).cloned() else {
            debug!("roster empty, no activity generated");
            return None;
        };
        let kind = self
            .rng
            .pick(&ActivityType::ALL)
            .copied()
            .unwrap_or(ActivityType::Edit);

        let content = match kind {
            ActivityType::Edit => {
                let name = self.rng.pick(&EDITED_SECTIONS).copied().unwrap_or("Overview");
                format!("Edited section \"{name}\".")
            }
            ActivityType::Comment => "@Alice Can you check this part?".to_string(),
            ActivityType::Mention => "@Bob Feedback needed on Section 2.".to_string(),
            ActivityType::Upload => "Uploaded reference image.".to_string(),
        };
        let section = self
            .rng
            .pick(&TARGET_SECTIONS)
            .copied()
            .unwrap_or("section-overview");

        let id = self.next_id(now);
        let mut activity = Activity::new(id, user, kind, now, content).with_section(section);
        if kind == ActivityType::Upload {
            activity = activity.with_preview(UPLOAD_PREVIEW);
        }
        Some(activity)
    }

    fn reshuffle_presence(&mut self) -> Vec<PresenceChange> {
        let flip_percent = self.config.presence_flip_percent;
        let mut changes = Vec::new();
        let mut next = Vec::with_capacity(self.roster.len());

        for user in &self.roster {
            if !self.rng.hit_rate_percent(flip_percent) {
                next.push(Arc::clone(user));
                continue;
            }
            let online = !user.online;
            let editing = self.rng.hit_rate_percent(50);
            changes.push(PresenceChange {
                user_id: user.id.clone(),
                online,
                editing,
            });
            next.push(Arc::new(User::clone(user).with_presence(online, editing)));
        }

        self.roster = next;
        debug!(changed = changes.len(), "presence reshuffled");
        changes
    }

    /// `a<millis>`, bumped past the previous id when the clock has not moved.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = match self.last_id_millis {
            Some(last) if now.timestamp_millis() <= last => last.saturating_add(1),
            _ => now.timestamp_millis(),
        };
        self.last_id_millis = Some(millis);
        format!("a{millis}")
    }
}
