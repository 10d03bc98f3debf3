use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::activity::ActivityType;

/// Allow-list criteria narrowing the visible feed.
///
/// Each set is independent. An empty set is inactive and matches every
/// activity; a non-empty set admits only its members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filter {
    pub users: BTreeSet<String>,
    pub types: BTreeSet<ActivityType>,
    pub projects: BTreeSet<String>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when at least one criterion is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !(self.users.is_empty() && self.types.is_empty() && self.projects.is_empty())
    }

    /// Add `user_id` to the user criterion, or remove it if already present.
    pub fn toggle_user(&mut self, user_id: &str) {
        toggle(&mut self.users, user_id.to_string());
    }

    pub fn toggle_type(&mut self, kind: ActivityType) {
        toggle(&mut self.types, kind);
    }

    pub fn toggle_project(&mut self, project: &str) {
        toggle(&mut self.projects, project.to_string());
    }

    /// Deactivate every criterion.
    pub fn clear(&mut self) {
        self.users.clear();
        self.types.clear();
        self.projects.clear();
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if set.contains(&value) {
        set.remove(&value);
    } else {
        set.insert(value);
    }
}
