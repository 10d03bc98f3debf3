//! Startup data for a dashboard: roster, initial activities, projects, outline.
//!
//! A [`Seed`] is handed to [`crate::dashboard::Dashboard::new`]; nothing in
//! the crate reads users or activities from global state. [`Seed::demo`]
//! provides the built-in sample workspace, and [`Seed::load`] reads a JSON
//! seed file in which activities reference users by id.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::model::{Activity, ActivityType, Reactions, Reply, User};
use crate::outline::{DocumentOutline, Section};

/// Failure to load or resolve a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{context} references unknown user '{user_id}'")]
    UnknownUser { context: String, user_id: String },
    #[error("duplicate activity id '{0}'")]
    DuplicateActivity(String),
}

impl SeedError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } | Self::Parse(_) => ErrorCode::ConfigParseError,
            Self::UnknownUser { .. } | Self::DuplicateActivity(_) => ErrorCode::SeedInvalid,
        }
    }
}

/// Resolved startup data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub users: Vec<Arc<User>>,
    pub activities: Vec<Arc<Activity>>,
    pub projects: Vec<String>,
    pub outline: DocumentOutline,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    users: Vec<User>,
    #[serde(default)]
    activities: Vec<SeedActivity>,
    #[serde(default)]
    projects: Vec<String>,
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedActivity {
    id: String,
    user: String,
    #[serde(rename = "type")]
    kind: ActivityType,
    timestamp: DateTime<Utc>,
    content: String,
    #[serde(default)]
    replies: Vec<SeedReply>,
    #[serde(default)]
    file_preview: Option<String>,
    #[serde(default)]
    target_section_id: Option<String>,
    #[serde(default)]
    reactions: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Deserialize, Serialize)]
struct SeedReply {
    id: String,
    user: String,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Seed {
    /// Read and resolve a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the file cannot be read or parsed, if an
    /// activity or reply names a user missing from the roster, or if two
    /// activities share an id.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and resolve seed JSON.
    ///
    /// # Errors
    ///
    /// See [`Seed::load`].
    pub fn from_json(raw: &str) -> Result<Self, SeedError> {
        let file: SeedFile = serde_json::from_str(raw)?;
        let users: Vec<Arc<User>> = file.users.into_iter().map(Arc::new).collect();
        let by_id: HashMap<&str, &Arc<User>> =
            users.iter().map(|u| (u.id.as_str(), u)).collect();

        let lookup = |user_id: &str, context: String| -> Result<Arc<User>, SeedError> {
            by_id
                .get(user_id)
                .map(|u| Arc::clone(u))
                .ok_or_else(|| SeedError::UnknownUser {
                    context,
                    user_id: user_id.to_string(),
                })
        };

        let mut seen = BTreeSet::new();
        let mut activities = Vec::with_capacity(file.activities.len());
        for entry in file.activities {
            if !seen.insert(entry.id.clone()) {
                return Err(SeedError::DuplicateActivity(entry.id));
            }
            let user = lookup(&entry.user, format!("activity '{}'", entry.id))?;
            let mut activity = Activity::new(
                entry.id.clone(),
                user,
                entry.kind,
                entry.timestamp,
                entry.content,
            )
            .with_reactions(Reactions::from(entry.reactions));
            activity.file_preview = entry.file_preview;
            activity.target_section_id = entry.target_section_id;
            for reply in entry.replies {
                let user = lookup(&reply.user, format!("reply '{}'", reply.id))?;
                activity = activity.with_reply(Reply {
                    id: reply.id,
                    user,
                    content: reply.content,
                    timestamp: reply.timestamp,
                });
            }
            activities.push(Arc::new(activity));
        }

        Ok(Self {
            users,
            activities,
            projects: file.projects,
            outline: DocumentOutline::new(file.sections),
        })
    }

    /// Built-in sample workspace: four teammates, three activities.
    #[must_use]
    pub fn demo() -> Self {
        let alice = Arc::new(
            User::new("u1", "Alice", "https://i.pravatar.cc/40?img=1")
                .with_role("Designer")
                .with_presence(true, true),
        );
        let bob = Arc::new(
            User::new("u2", "Bob", "https://i.pravatar.cc/40?img=2")
                .with_role("Developer")
                .with_presence(true, false),
        );
        let carol = Arc::new(
            User::new("u3", "Carol", "https://i.pravatar.cc/40?img=3")
                .with_role("PM")
                .with_presence(false, false),
        );
        let david = Arc::new(
            User::new("u4", "David", "https://i.pravatar.cc/40?img=4")
                .with_role("Writer")
                .with_presence(true, false),
        );

        let at = |raw: &str| {
            DateTime::parse_from_rfc3339(raw)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default()
        };
        let reactions = |emoji: &str, reactors: &[&str]| {
            let mut r = Reactions::new();
            for reactor in reactors {
                r.toggle(emoji, reactor);
            }
            r
        };

        let activities = vec![
            Activity::new(
                "a1",
                Arc::clone(&alice),
                ActivityType::Edit,
                at("2024-06-27T12:00:00Z"),
                "Edited section \"Introduction\".",
            )
            .with_section("section-intro")
            .with_reactions(reactions("👍", &["u2", "u3"])),
            Activity::new(
                "a2",
                Arc::clone(&bob),
                ActivityType::Comment,
                at("2024-06-27T12:01:00Z"),
                "@Alice Can you review this paragraph?",
            )
            .with_reply(Reply {
                id: "r1".into(),
                user: Arc::clone(&alice),
                content: "Sure, I'll check it now.".into(),
                timestamp: at("2024-06-27T12:01:30Z"),
            })
            .with_section("section-para1")
            .with_reactions(reactions("👀", &["u1"])),
            Activity::new(
                "a3",
                Arc::clone(&carol),
                ActivityType::Upload,
                at("2024-06-27T12:02:00Z"),
                "Uploaded design mockup.",
            )
            .with_preview("/uploads/design-mockup.png")
            .with_section("section-design")
            .with_reactions(reactions("🎨", &["u1", "u2", "u4"])),
        ];

        let outline = DocumentOutline::new(vec![
            Section::new("section-intro", "Introduction"),
            Section::new("section-para1", "Main Paragraph"),
            Section::new("section-design", "Design Mockup"),
            Section::new("section-wireframes", "Wireframes"),
            Section::new("section-summary", "Summary"),
            Section::new("section-overview", "Overview"),
            Section::new("section-details", "Details"),
            Section::new("section-conclusion", "Conclusion"),
        ]);

        Self {
            users: vec![alice, bob, carol, david],
            activities: activities.into_iter().map(Arc::new).collect(),
            projects: default_projects(),
            outline,
        }
    }
}

/// Project names activities are attributed to when none are configured.
#[must_use]
pub fn default_projects() -> Vec<String> {
    ["Design System", "Docs", "API", "Marketing"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_seed_is_consistent() {
        let seed = Seed::demo();
        assert_eq!(seed.users.len(), 4);
        assert_eq!(seed.activities.len(), 3);
        assert_eq!(seed.activities[0].reactions.count("👍"), 2);
        assert_eq!(seed.activities[2].reactions.count("🎨"), 3);
        assert_eq!(seed.activities[1].reply_count(), 1);
        for activity in &seed.activities {
            let section = activity.target_section_id.as_deref().expect("section");
            assert!(seed.outline.find(section).is_some());
        }
    }

    #[test]
    fn json_seed_resolves_user_references() {
        let raw = r#"{
            "users": [{"id": "u1", "name": "Ann", "avatar": ""}],
            "activities": [{
                "id": "x1", "user": "u1", "type": "mention",
                "timestamp": "2024-01-01T00:00:00Z", "content": "@Ann hi",
                "replies": [{"id": "r1", "user": "u1", "content": "ok",
                             "timestamp": "2024-01-01T00:01:00Z"}],
                "reactions": {"👍": ["u1"]}
            }],
            "projects": ["Docs"],
            "sections": [{"id": "s1", "label": "One"}]
        }"#;
        let seed = Seed::from_json(raw).expect("seed parses");
        assert_eq!(seed.activities[0].user.name, "Ann");
        assert!(Arc::ptr_eq(&seed.activities[0].user, &seed.users[0]));
        assert_eq!(seed.activities[0].reply_count(), 1);
        assert_eq!(seed.projects, vec!["Docs".to_string()]);
        assert!(seed.outline.find("s1").is_some());
    }

    #[test]
    fn unknown_user_is_rejected() {
        let raw = r#"{
            "users": [],
            "activities": [{"id": "x1", "user": "ghost", "type": "edit",
                            "timestamp": "2024-01-01T00:00:00Z", "content": ""}]
        }"#;
        let err = Seed::from_json(raw).expect_err("unknown user");
        assert!(matches!(err, SeedError::UnknownUser { .. }));
        assert_eq!(err.code(), ErrorCode::SeedInvalid);
    }

    #[test]
    fn duplicate_activity_is_rejected() {
        let raw = r#"{
            "users": [{"id": "u1", "name": "Ann", "avatar": ""}],
            "activities": [
                {"id": "x1", "user": "u1", "type": "edit", "timestamp": "2024-01-01T00:00:00Z", "content": ""},
                {"id": "x1", "user": "u1", "type": "edit", "timestamp": "2024-01-01T00:00:00Z", "content": ""}
            ]
        }"#;
        assert!(matches!(
            Seed::from_json(raw),
            Err(SeedError::DuplicateActivity(id)) if id == "x1"
        ));
    }
}
