//! Property tests for the pure feed operations.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use huddle_core::feed::{apply_filter, summarize, toggle_reaction};
use huddle_core::model::{Activity, ActivityType, Filter, User};
use proptest::prelude::*;

const EMOJI: [&str; 3] = ["👍", "👀", "🎨"];
const VIEWERS: [&str; 4] = ["u1", "u2", "u3", "current-user"];

fn arb_kind() -> impl Strategy<Value = ActivityType> {
    prop_oneof![
        Just(ActivityType::Edit),
        Just(ActivityType::Comment),
        Just(ActivityType::Mention),
        Just(ActivityType::Upload),
    ]
}

fn arb_feed() -> impl Strategy<Value = Vec<Arc<Activity>>> {
    prop::collection::vec((arb_kind(), 0..4usize), 0..24).prop_map(|rows| {
        let ts = Utc
            .with_ymd_and_hms(2024, 6, 27, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        rows.into_iter()
            .enumerate()
            .map(|(i, (kind, user))| {
                let user = Arc::new(User::new(format!("u{user}"), format!("User {user}"), ""));
                Arc::new(Activity::new(format!("a{i}"), user, kind, ts, "content"))
            })
            .collect()
    })
}

fn projects() -> Vec<String> {
    vec!["Design System".into(), "Docs".into(), "API".into(), "Marketing".into()]
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn empty_filter_is_identity(feed in arb_feed()) {
        let visible = apply_filter(&feed, &Filter::new(), &projects());
        prop_assert_eq!(visible.len(), feed.len());
        for (a, b) in feed.iter().zip(&visible) {
            prop_assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn filtered_feed_is_an_ordered_subsequence(feed in arb_feed(), kind in arb_kind()) {
        let mut filter = Filter::new();
        filter.toggle_type(kind);
        let visible = apply_filter(&feed, &filter, &projects());
        prop_assert!(visible.iter().all(|a| a.kind == kind));

        let mut cursor = feed.iter();
        for item in &visible {
            prop_assert!(cursor.any(|a| Arc::ptr_eq(a, item)));
        }
    }

    #[test]
    fn summary_counts_sum_to_length(feed in arb_feed()) {
        let summary = summarize(&feed);
        prop_assert_eq!(summary.total(), feed.len());
        prop_assert_eq!(summary.iter().map(|(_, n)| n).sum::<usize>(), feed.len());
    }

    #[test]
    fn double_toggle_restores_reactions(
        feed in arb_feed().prop_filter("non-empty", |f| !f.is_empty()),
        pick in any::<prop::sample::Index>(),
        emoji in 0..EMOJI.len(),
        viewer in 0..VIEWERS.len(),
    ) {
        let target = pick.get(&feed).id.clone();
        let once = toggle_reaction(&feed, &target, EMOJI[emoji], VIEWERS[viewer]);
        let twice = toggle_reaction(&once, &target, EMOJI[emoji], VIEWERS[viewer]);
        for (before, after) in feed.iter().zip(&twice) {
            prop_assert_eq!(&before.reactions, &after.reactions);
        }
    }

    #[test]
    fn count_always_matches_reactor_set(
        toggles in prop::collection::vec((0..EMOJI.len(), 0..VIEWERS.len()), 0..64),
    ) {
        let user = Arc::new(User::new("u1", "Alice", ""));
        let ts = Utc.with_ymd_and_hms(2024, 6, 27, 12, 0, 0).single().expect("ts");
        let mut feed = vec![Arc::new(Activity::new("a1", user, ActivityType::Edit, ts, ""))];

        for (emoji, viewer) in toggles {
            feed = toggle_reaction(&feed, "a1", EMOJI[emoji], VIEWERS[viewer]);
            let reactions = &feed[0].reactions;
            for e in EMOJI {
                let expected = reactions.reactors(e).map_or(0, std::collections::BTreeSet::len);
                prop_assert_eq!(reactions.count(e), expected);
                prop_assert!(reactions.reactors(e).is_none_or(|set| !set.is_empty()));
            }
        }
    }
}

#[test]
fn n_viewers_react_then_all_withdraw() {
    let user = Arc::new(User::new("u1", "Alice", ""));
    let ts = Utc.with_ymd_and_hms(2024, 6, 27, 12, 0, 0).single().expect("ts");
    let mut feed = vec![Arc::new(Activity::new("a1", user, ActivityType::Upload, ts, ""))];

    for viewer in VIEWERS {
        feed = toggle_reaction(&feed, "a1", "🎨", viewer);
    }
    assert_eq!(feed[0].reactions.count("🎨"), VIEWERS.len());

    for viewer in VIEWERS {
        feed = toggle_reaction(&feed, "a1", "🎨", viewer);
    }
    assert!(feed[0].reactions.reactors("🎨").is_none());
    assert!(feed[0].reactions.is_empty());
}
