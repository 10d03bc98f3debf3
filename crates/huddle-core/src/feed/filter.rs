//! Filter engine: derives the visible feed from the full activity list.

use std::sync::Arc;

use crate::model::{Activity, Filter};

/// Project an activity is attributed to.
///
/// Activities carry no project of their own, so one is derived from the
/// first character of the id: its code point modulo the project count picks
/// an entry. Returns `None` for an empty id or an empty project list.
#[must_use]
pub fn project_for<'a>(activity_id: &str, projects: &'a [String]) -> Option<&'a str> {
    let first = activity_id.chars().next()?;
    if projects.is_empty() {
        return None;
    }
    let index = (u32::from(first) as usize) % projects.len();
    projects.get(index).map(String::as_str)
}

/// Whether a single activity passes every active criterion of `filter`.
#[must_use]
pub fn matches(activity: &Activity, filter: &Filter, projects: &[String]) -> bool {
    if !filter.users.is_empty() && !filter.users.contains(&activity.user.id) {
        return false;
    }
    if !filter.types.is_empty() && !filter.types.contains(&activity.kind) {
        return false;
    }
    if !filter.projects.is_empty() {
        let Some(project) = project_for(&activity.id, projects) else {
            return false;
        };
        if !filter.projects.contains(project) {
            return false;
        }
    }
    true
}

/// Ordered subsequence of `activities` passing `filter`.
///
/// Returned entries share their allocation with the input.
#[must_use]
pub fn apply_filter(
    activities: &[Arc<Activity>],
    filter: &Filter,
    projects: &[String],
) -> Vec<Arc<Activity>> {
    activities
        .iter()
        .filter(|activity| matches(activity, filter, projects))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivityType, User};
    use chrono::{TimeZone, Utc};

    fn projects() -> Vec<String> {
        ["Design System", "Docs", "API", "Marketing"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn activity(id: &str, user: &str, kind: ActivityType) -> Arc<Activity> {
        let ts = Utc.with_ymd_and_hms(2024, 6, 27, 12, 0, 0).single().expect("ts");
        Arc::new(Activity::new(
            id,
            Arc::new(User::new(user, user, "")),
            kind,
            ts,
            "",
        ))
    }

    #[test]
    fn project_uses_first_code_point() {
        let projects = projects();
        // 'a' is 97, 97 % 4 == 1
        assert_eq!(project_for("a1", &projects), Some("Docs"));
        // 'b' is 98, 98 % 4 == 2
        assert_eq!(project_for("b7", &projects), Some("API"));
        assert_eq!(project_for("", &projects), None);
        assert_eq!(project_for("a1", &[]), None);
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let feed = vec![
            activity("a1", "u1", ActivityType::Edit),
            activity("a2", "u2", ActivityType::Comment),
        ];
        let visible = apply_filter(&feed, &Filter::new(), &projects());
        assert_eq!(visible.len(), 2);
        assert!(Arc::ptr_eq(&visible[0], &feed[0]));
        assert!(Arc::ptr_eq(&visible[1], &feed[1]));
    }

    #[test]
    fn criteria_combine_with_and() {
        let feed = vec![
            activity("a1", "u1", ActivityType::Edit),
            activity("a2", "u1", ActivityType::Comment),
            activity("a3", "u2", ActivityType::Comment),
        ];
        let mut filter = Filter::new();
        filter.toggle_user("u1");
        filter.toggle_type(ActivityType::Comment);

        let visible = apply_filter(&feed, &filter, &projects());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a2");
    }

    #[test]
    fn project_criterion_uses_derived_project() {
        let feed = vec![
            activity("a1", "u1", ActivityType::Edit),
            activity("b1", "u1", ActivityType::Edit),
        ];
        let mut filter = Filter::new();
        filter.toggle_project("API");
        let visible = apply_filter(&feed, &filter, &projects());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "b1");

        // Without a project list nothing can match an active project criterion.
        assert!(apply_filter(&feed, &filter, &[]).is_empty());
    }
}
