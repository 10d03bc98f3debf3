use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use huddle_core::dashboard::Dashboard;
use huddle_core::feed::{self, mentioned_names, render_marked, time_ago};
use huddle_core::model::{Activity, ActivityType, Filter};
use serde::Serialize;

use crate::output::{self, OutputMode, pretty_section};

#[derive(Args, Debug)]
pub struct FeedArgs {
    /// Show only these user ids for this run (stored filters are ignored).
    #[arg(long = "user", value_name = "ID")]
    pub users: Vec<String>,

    /// Show only these activity types for this run.
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<ActivityType>,

    /// Show only these projects for this run.
    #[arg(long = "project", value_name = "NAME")]
    pub projects: Vec<String>,

    /// Maximum number of items to print.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

impl FeedArgs {
    /// Filter built from the one-off flags, if any were given.
    fn one_off_filter(&self) -> Option<Filter> {
        if self.users.is_empty() && self.types.is_empty() && self.projects.is_empty() {
            return None;
        }
        let mut filter = Filter::new();
        filter.users.extend(self.users.iter().cloned());
        filter.types.extend(self.types.iter().copied());
        filter.projects.extend(self.projects.iter().cloned());
        Some(filter)
    }
}

#[derive(Debug, Serialize)]
pub struct FeedRow {
    pub id: String,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub project: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub ago: String,
    pub content: String,
    pub mentions: Vec<String>,
    pub reactions: BTreeMap<String, usize>,
    pub replies: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl FeedRow {
    pub fn new(activity: &Activity, project: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            id: activity.id.clone(),
            user: activity.user.name.clone(),
            kind: activity.kind,
            project: project.map(str::to_string),
            timestamp: activity.timestamp,
            ago: time_ago(activity.timestamp, now),
            content: activity.content.clone(),
            mentions: mentioned_names(&activity.content)
                .into_iter()
                .map(str::to_string)
                .collect(),
            reactions: activity.reactions.counts(),
            replies: activity.reply_count(),
            section: activity.target_section_id.clone(),
            preview: activity.file_preview.clone(),
        }
    }

    /// One tab-separated line.
    pub fn write_text(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.id,
            self.ago,
            self.user,
            self.kind,
            self.project.as_deref().unwrap_or("-"),
            self.content
        )
    }

    /// Multi-line entry with highlighted mentions.
    pub fn write_pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:<13} {} · {} · {}",
            self.ago,
            self.user,
            self.kind.label(),
            self.project.as_deref().unwrap_or("-")
        )?;
        writeln!(w, "  {}", render_marked(&self.content, "\x1b[1m", "\x1b[0m"))?;
        if let Some(preview) = &self.preview {
            writeln!(w, "  [file] {preview}")?;
        }
        let mut footer: Vec<String> = self
            .reactions
            .iter()
            .map(|(emoji, count)| format!("{emoji} {count}"))
            .collect();
        if self.replies > 0 {
            footer.push(format!("{} repl{}", self.replies, if self.replies == 1 { "y" } else { "ies" }));
        }
        if !footer.is_empty() {
            writeln!(w, "  {}", footer.join("  "))?;
        }
        Ok(())
    }
}

/// Rows for `activities`, attributed against the dashboard's projects.
pub fn rows(dashboard: &Dashboard, activities: &[Arc<Activity>], now: DateTime<Utc>) -> Vec<FeedRow> {
    activities
        .iter()
        .map(|a| FeedRow::new(a, dashboard.project_of(a), now))
        .collect()
}

pub fn run_feed(
    args: &FeedArgs,
    output: OutputMode,
    project_root: &Path,
    prefs: Option<&Path>,
) -> Result<()> {
    let mut ws = super::open_workspace(project_root, prefs)?;
    let dashboard = &mut ws.dashboard;
    let now = Utc::now();

    let visible = args.one_off_filter().map_or_else(
        || dashboard.visible(),
        |filter| feed::apply_filter(dashboard.activities(), &filter, dashboard.projects()),
    );
    let limit = args.limit.unwrap_or(usize::MAX);
    let rows: Vec<FeedRow> = rows(dashboard, &visible, now).into_iter().take(limit).collect();

    let first_visit = dashboard.show_landing();
    if first_visit {
        dashboard.enter_dashboard();
    }

    output::render_mode(
        output,
        &rows,
        |rows, w| {
            for row in rows {
                row.write_text(w)?;
            }
            Ok(())
        },
        |rows, w| {
            if first_visit {
                writeln!(w, "Welcome to huddle. Your team's recent activity is below.\n")?;
            }
            pretty_section(w, &format!("Activity ({})", rows.len()))?;
            if rows.is_empty() {
                writeln!(w, "No activity matches the current filters.")?;
            }
            for row in rows {
                row.write_pretty(w)?;
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use huddle_core::model::User;

    fn activity() -> Activity {
        let ts = Utc.with_ymd_and_hms(2024, 6, 27, 12, 0, 0).single().expect("ts");
        let user = Arc::new(User::new("u1", "Alice", ""));
        let mut activity = Activity::new("a1", user, ActivityType::Comment, ts, "@Bob see @Carol");
        activity.reactions.toggle("👍", "u2");
        activity
    }

    #[test]
    fn row_collects_mentions_and_counts() {
        let now = Utc.with_ymd_and_hms(2024, 6, 27, 12, 3, 0).single().expect("now");
        let row = FeedRow::new(&activity(), Some("Docs"), now);
        assert_eq!(row.ago, "3 mins ago");
        assert_eq!(row.mentions, ["Bob", "Carol"]);
        assert_eq!(row.reactions.get("👍"), Some(&1));
        assert_eq!(row.replies, 0);
    }

    #[test]
    fn text_row_is_tab_separated() {
        let now = Utc.with_ymd_and_hms(2024, 6, 27, 12, 0, 10).single().expect("now");
        let row = FeedRow::new(&activity(), None, now);
        let mut buf = Vec::new();
        row.write_text(&mut buf).expect("write");
        let line = String::from_utf8(buf).expect("utf8");
        assert_eq!(line, "a1\tJust now\tAlice\tcomment\t-\t@Bob see @Carol\n");
    }

    #[test]
    fn pretty_row_marks_mentions() {
        let now = Utc.with_ymd_and_hms(2024, 6, 27, 14, 0, 0).single().expect("now");
        let row = FeedRow::new(&activity(), Some("API"), now);
        let mut buf = Vec::new();
        row.write_pretty(&mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("2 hours ago"));
        assert!(text.contains("\x1b[1m@Bob\x1b[0m"));
        assert!(text.contains("👍 1"));
    }

    #[test]
    fn one_off_filter_only_when_flags_given() {
        let empty = FeedArgs {
            users: vec![],
            types: vec![],
            projects: vec![],
            limit: None,
        };
        assert!(empty.one_off_filter().is_none());

        let typed = FeedArgs {
            types: vec![ActivityType::Upload],
            ..empty
        };
        let filter = typed.one_off_filter().expect("filter");
        assert!(filter.types.contains(&ActivityType::Upload));
    }
}
