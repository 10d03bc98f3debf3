use chrono::{DateTime, Utc};

/// Relative label for `then` as seen from `now`.
///
/// Granularity stops at hours. Timestamps in the future read as "Just now".
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes().max(0);
    match minutes {
        0 => "Just now".to_string(),
        1 => "1 min ago".to_string(),
        2..=59 => format!("{minutes} mins ago"),
        60..=119 => "1 hour ago".to_string(),
        _ => format!("{} hours ago", minutes / 60),
    }
}
