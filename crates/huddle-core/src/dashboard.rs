//! The dashboard state owner.
//!
//! [`Dashboard`] is the single owner of the roster, the activity collection,
//! the filter selection, and section emphasis. Viewer actions and generator
//! ticks arrive one at a time as method calls. Collections are swapped
//! wholesale on every change so a reader holding an earlier snapshot never
//! sees a half-applied update.
//!
//! Preference changes (filter, theme, landing flag) are written through to
//! the [`PreferenceStore`]. A failed write is logged and otherwise ignored:
//! the in-memory state still changes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::export::ExportDocument;
use crate::feed::{self, TypeSummary};
use crate::live::TickOutcome;
use crate::model::{Activity, ActivityType, Filter, Reply, User};
use crate::outline::{DocumentOutline, Section, SectionEmphasis};
use crate::prefs::{self, PreferenceError, PreferenceStore, Preferences, Theme};
use crate::seed::Seed;

pub struct Dashboard {
    users: Vec<Arc<User>>,
    activities: Vec<Arc<Activity>>,
    projects: Vec<String>,
    outline: DocumentOutline,
    viewer: String,
    prefs: Preferences,
    store: Box<dyn PreferenceStore + Send>,
    emphasis: Option<SectionEmphasis>,
    last_reply_millis: Option<i64>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("users", &self.users.len())
            .field("activities", &self.activities.len())
            .field("viewer", &self.viewer)
            .field("prefs", &self.prefs)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Build a dashboard from startup data, reading preferences from `store`.
    pub fn new(
        seed: Seed,
        viewer: impl Into<String>,
        store: Box<dyn PreferenceStore + Send>,
    ) -> Self {
        let prefs = Preferences::load(store.as_ref());
        let viewer = viewer.into();
        info!(
            users = seed.users.len(),
            activities = seed.activities.len(),
            viewer = %viewer,
            "dashboard ready"
        );
        Self {
            users: seed.users,
            activities: seed.activities,
            projects: seed.projects,
            outline: seed.outline,
            viewer,
            prefs,
            store,
            emphasis: None,
            last_reply_millis: None,
        }
    }

    #[must_use]
    pub fn users(&self) -> &[Arc<User>] {
        &self.users
    }

    /// Full collection, newest first once the generator has run.
    #[must_use]
    pub fn activities(&self) -> &[Arc<Activity>] {
        &self.activities
    }

    #[must_use]
    pub fn projects(&self) -> &[String] {
        &self.projects
    }

    #[must_use]
    pub const fn outline(&self) -> &DocumentOutline {
        &self.outline
    }

    #[must_use]
    pub fn viewer(&self) -> &str {
        &self.viewer
    }

    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.prefs.filter
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.prefs.theme
    }

    /// Whether the landing screen should be shown before the dashboard.
    #[must_use]
    pub const fn show_landing(&self) -> bool {
        !self.prefs.landing_visited
    }

    /// Project attributed to `activity`.
    #[must_use]
    pub fn project_of(&self, activity: &Activity) -> Option<&str> {
        feed::project_for(&activity.id, &self.projects)
    }

    /// Activities passing the current filter, in collection order.
    #[must_use]
    pub fn visible(&self) -> Vec<Arc<Activity>> {
        feed::apply_filter(&self.activities, &self.prefs.filter, &self.projects)
    }

    /// Type tallies over the visible activities.
    #[must_use]
    pub fn summary(&self) -> TypeSummary {
        feed::summarize(&self.visible())
    }

    /// Toggle the viewer's `emoji` reaction on `activity_id`.
    pub fn react(&mut self, activity_id: &str, emoji: &str) {
        self.activities = feed::toggle_reaction(&self.activities, activity_id, emoji, &self.viewer);
    }

    /// Append a reply by roster member `author_id`. Unknown activity or
    /// author is a no-op. Returns the new reply id when one was added.
    pub fn reply(
        &mut self,
        activity_id: &str,
        author_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let Some(author) = self.users.iter().find(|u| u.id == author_id).map(Arc::clone) else {
            debug!(author = author_id, "reply author not in roster, skipped");
            return None;
        };
        if !self.activities.iter().any(|a| a.id == activity_id) {
            debug!(activity = activity_id, "reply target not found, skipped");
            return None;
        }

        let id = self.next_reply_id(now);
        let reply = Reply {
            id: id.clone(),
            user: author,
            content: content.to_string(),
            timestamp: now,
        };
        self.activities = feed::append_reply(&self.activities, activity_id, reply);
        Some(id)
    }

    fn next_reply_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = match self.last_reply_millis {
            Some(last) if now.timestamp_millis() <= last => last.saturating_add(1),
            _ => now.timestamp_millis(),
        };
        self.last_reply_millis = Some(millis);
        format!("r{millis}")
    }

    pub fn toggle_user_filter(&mut self, user_id: &str) {
        self.update_filter(|filter| filter.toggle_user(user_id));
    }

    pub fn toggle_type_filter(&mut self, kind: ActivityType) {
        self.update_filter(|filter| filter.toggle_type(kind));
    }

    pub fn toggle_project_filter(&mut self, project: &str) {
        self.update_filter(|filter| filter.toggle_project(project));
    }

    pub fn clear_filters(&mut self) {
        self.update_filter(Filter::clear);
    }

    /// A click on a summary bar toggles that type in the filter.
    pub fn chart_bar_click(&mut self, kind: ActivityType) {
        self.toggle_type_filter(kind);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.prefs.theme = theme;
        let result = prefs::save_theme(self.store.as_mut(), theme);
        log_write_failure("theme", result);
    }

    /// Leave the landing screen; remembered across restarts.
    pub fn enter_dashboard(&mut self) {
        self.prefs.landing_visited = true;
        let result = prefs::save_landing_visited(self.store.as_mut(), true);
        log_write_failure("landing", result);
    }

    /// Apply one generator tick: prepend the new activity and replace the
    /// presence flags of every changed roster member.
    pub fn apply_tick(&mut self, outcome: TickOutcome) {
        if let Some(activity) = outcome.activity {
            info!(id = %activity.id, kind = %activity.kind, user = %activity.user.name, "live activity");
            let mut next = Vec::with_capacity(self.activities.len() + 1);
            next.push(Arc::new(activity));
            next.extend(self.activities.iter().cloned());
            self.activities = next;
        }

        if !outcome.presence.is_empty() {
            self.users = self
                .users
                .iter()
                .map(|user| {
                    outcome
                        .presence
                        .iter()
                        .find(|change| change.user_id == user.id)
                        .map_or_else(
                            || Arc::clone(user),
                            |change| {
                                let mut updated = User::clone(user);
                                updated.online = change.online;
                                updated.editing = change.editing;
                                Arc::new(updated)
                            },
                        )
                })
                .collect();
            debug!(changed = outcome.presence.len(), "presence updated");
        }
    }

    /// Jump to `section_id`, emphasizing it briefly. Unknown ids are ignored.
    pub fn jump_to_section(&mut self, section_id: &str, now: DateTime<Utc>) -> Option<&Section> {
        let Some(section) = self.outline.find(section_id) else {
            debug!(section = section_id, "section not found, jump skipped");
            return None;
        };
        self.emphasis = Some(SectionEmphasis::starting_at(section_id, now));
        Some(section)
    }

    /// The current section emphasis, cleared once it has expired.
    pub fn active_emphasis(&mut self, now: DateTime<Utc>) -> Option<&SectionEmphasis> {
        if self.emphasis.as_ref().is_some_and(|e| !e.is_active(now)) {
            self.emphasis = None;
        }
        self.emphasis.as_ref()
    }

    /// Export document for the visible activities.
    #[must_use]
    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::build(&self.visible(), now)
    }

    fn update_filter(&mut self, edit: impl FnOnce(&mut Filter)) {
        edit(&mut self.prefs.filter);
        let result = prefs::save_filter(self.store.as_mut(), &self.prefs.filter);
        log_write_failure("filter", result);
    }
}

fn log_write_failure(what: &str, result: Result<(), PreferenceError>) {
    if let Err(err) = result {
        warn!(preference = what, code = %err.code(), error = %err, "preference not saved");
    }
}
