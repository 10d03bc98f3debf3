//! Reaction aggregator and thread replies.
//!
//! Both operations follow the replace-on-write rule: they return a new
//! collection in which only the targeted activity is a fresh allocation.
//! Every other entry is the same `Arc` as in the input, so a renderer can
//! skip unchanged items with a pointer comparison.

use std::sync::Arc;

use tracing::debug;

use crate::model::{Activity, ReactionChange, Reply};

/// Emoji offered as one-click reactions on every activity.
pub const QUICK_REACTIONS: [&str; 3] = ["👍", "👀", "🎨"];

/// Toggle `viewer`'s `emoji` reaction on the activity with `activity_id`.
///
/// An unknown id returns the collection unchanged.
#[must_use]
pub fn toggle_reaction(
    activities: &[Arc<Activity>],
    activity_id: &str,
    emoji: &str,
    viewer: &str,
) -> Vec<Arc<Activity>> {
    replace_one(activities, activity_id, |activity| {
        let change = activity.reactions.toggle(emoji, viewer);
        debug!(
            activity = activity_id,
            emoji,
            viewer,
            added = matches!(change, ReactionChange::Added),
            count = activity.reactions.count(emoji),
            "reaction toggled"
        );
    })
}

/// Append `reply` to the thread of the activity with `activity_id`.
///
/// Creates the thread when the activity has none. An unknown id returns the
/// collection unchanged.
#[must_use]
pub fn append_reply(
    activities: &[Arc<Activity>],
    activity_id: &str,
    reply: Reply,
) -> Vec<Arc<Activity>> {
    let mut reply = Some(reply);
    replace_one(activities, activity_id, |activity| {
        if let Some(reply) = reply.take() {
            activity
                .thread
                .get_or_insert_with(Default::default)
                .replies
                .push(reply);
        }
    })
}

fn replace_one(
    activities: &[Arc<Activity>],
    activity_id: &str,
    mut edit: impl FnMut(&mut Activity),
) -> Vec<Arc<Activity>> {
    if !activities.iter().any(|a| a.id == activity_id) {
        debug!(activity = activity_id, "activity not found, update skipped");
        return activities.to_vec();
    }

    activities
        .iter()
        .map(|activity| {
            if activity.id == activity_id {
                let mut updated = Activity::clone(activity);
                edit(&mut updated);
                Arc::new(updated)
            } else {
                Arc::clone(activity)
            }
        })
        .collect()
}
