use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// The four kinds of collaboration event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Edit,
    Comment,
    Mention,
    Upload,
}

impl ActivityType {
    /// Every type, in display order.
    pub const ALL: [Self; 4] = [Self::Edit, Self::Comment, Self::Mention, Self::Upload];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::Upload => "upload",
        }
    }

    /// Badge label shown next to an activity.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Comment => "Comment",
            Self::Mention => "Mention",
            Self::Upload => "File Upload",
        }
    }

    /// Position in [`ActivityType::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Edit => 0,
            Self::Comment => 1,
            Self::Mention => 2,
            Self::Upload => 3,
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name an [`ActivityType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity type '{raw}' (expected edit, comment, mention, or upload)")]
pub struct InvalidActivityType {
    pub raw: String,
}

impl FromStr for ActivityType {
    type Err = InvalidActivityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edit" => Ok(Self::Edit),
            "comment" => Ok(Self::Comment),
            "mention" => Ok(Self::Mention),
            "upload" => Ok(Self::Upload),
            _ => Err(InvalidActivityType { raw: s.to_string() }),
        }
    }
}

/// What a reaction toggle did to the viewer's membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Added,
    Removed,
}

/// Per-emoji reactor sets attached to an activity.
///
/// The count for an emoji is the size of its reactor set. Sets are never
/// empty: removing the last reactor removes the emoji entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, BTreeSet<String>>",
    into = "BTreeMap<String, BTreeSet<String>>"
)]
pub struct Reactions {
    by_emoji: BTreeMap<String, BTreeSet<String>>,
}

impl From<BTreeMap<String, BTreeSet<String>>> for Reactions {
    fn from(mut by_emoji: BTreeMap<String, BTreeSet<String>>) -> Self {
        by_emoji.retain(|_, reactors| !reactors.is_empty());
        Self { by_emoji }
    }
}

impl From<Reactions> for BTreeMap<String, BTreeSet<String>> {
    fn from(reactions: Reactions) -> Self {
        reactions.by_emoji
    }
}

impl Reactions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct reactors for `emoji` (zero when absent).
    #[must_use]
    pub fn count(&self, emoji: &str) -> usize {
        self.by_emoji.get(emoji).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn has_reacted(&self, emoji: &str, reactor: &str) -> bool {
        self.by_emoji
            .get(emoji)
            .is_some_and(|reactors| reactors.contains(reactor))
    }

    /// Reactor identities for `emoji`, if any.
    #[must_use]
    pub fn reactors(&self, emoji: &str) -> Option<&BTreeSet<String>> {
        self.by_emoji.get(emoji)
    }

    /// Flip `reactor`'s membership for `emoji`.
    pub fn toggle(&mut self, emoji: &str, reactor: &str) -> ReactionChange {
        if let Some(reactors) = self.by_emoji.get_mut(emoji) {
            if reactors.remove(reactor) {
                if reactors.is_empty() {
                    self.by_emoji.remove(emoji);
                }
                return ReactionChange::Removed;
            }
            reactors.insert(reactor.to_string());
            return ReactionChange::Added;
        }

        self.by_emoji
            .insert(emoji.to_string(), BTreeSet::from([reactor.to_string()]));
        ReactionChange::Added
    }

    /// Flattened `emoji -> count` view.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.by_emoji
            .iter()
            .map(|(emoji, reactors)| (emoji.clone(), reactors.len()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_emoji
            .iter()
            .map(|(emoji, reactors)| (emoji.as_str(), reactors.len()))
    }

    /// Number of distinct emoji with at least one reactor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_emoji.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_emoji.is_empty()
    }
}

/// A reply inside an activity's discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub user: Arc<User>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only reply list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// A single recorded collaboration event.
///
/// Everything except `reactions` and `thread` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user: Arc<User>,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread: Option<Thread>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_section_id: Option<String>,
    #[serde(default)]
    pub reactions: Reactions,
}

impl Activity {
    pub fn new(
        id: impl Into<String>,
        user: Arc<User>,
        kind: ActivityType,
        timestamp: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user,
            kind,
            timestamp,
            content: content.into(),
            thread: None,
            file_preview: None,
            target_section_id: None,
            reactions: Reactions::new(),
        }
    }

    #[must_use]
    pub fn with_section(mut self, section_id: impl Into<String>) -> Self {
        self.target_section_id = Some(section_id.into());
        self
    }

    #[must_use]
    pub fn with_preview(mut self, uri: impl Into<String>) -> Self {
        self.file_preview = Some(uri.into());
        self
    }

    #[must_use]
    pub fn with_reactions(mut self, reactions: Reactions) -> Self {
        self.reactions = reactions;
        self
    }

    #[must_use]
    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.thread.get_or_insert_with(Thread::default).replies.push(reply);
        self
    }

    /// Number of replies in the thread (zero without a thread).
    #[must_use]
    pub fn reply_count(&self) -> usize {
        self.thread.as_ref().map_or(0, |t| t.replies.len())
    }
}
