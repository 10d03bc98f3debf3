use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use huddle_core::model::{ActivityType, Filter};
use serde::Serialize;
use tracing::info;

use crate::output::{self, OutputMode, pretty_kv, pretty_section};

/// Persisted filter toggles.
#[derive(Subcommand, Debug)]
pub enum FilterCommand {
    /// Toggle a user id in the filter.
    User {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Toggle an activity type (edit, comment, mention, upload).
    #[command(name = "type")]
    Kind {
        #[arg(value_name = "TYPE")]
        kind: ActivityType,
    },
    /// Toggle a project name.
    Project {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Remove every criterion.
    Clear,
    /// Print the stored filter without changing it.
    Show,
}

#[derive(Debug, Serialize)]
pub struct FilterReport {
    pub filter: Filter,
    pub active: bool,
    pub visible: usize,
    pub total: usize,
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "(any)".to_string() } else { joined }
}

pub fn run_filter(
    command: &FilterCommand,
    output: OutputMode,
    project_root: &Path,
    prefs: Option<&Path>,
) -> Result<()> {
    let mut ws = super::open_workspace(project_root, prefs)?;
    let dashboard = &mut ws.dashboard;

    match command {
        FilterCommand::User { id } => dashboard.toggle_user_filter(id),
        FilterCommand::Kind { kind } => dashboard.toggle_type_filter(*kind),
        FilterCommand::Project { name } => dashboard.toggle_project_filter(name),
        FilterCommand::Clear => dashboard.clear_filters(),
        FilterCommand::Show => {}
    }
    if !matches!(command, FilterCommand::Show) {
        info!(active = dashboard.filter().is_active(), "filter updated");
    }

    let report = FilterReport {
        filter: dashboard.filter().clone(),
        active: dashboard.filter().is_active(),
        visible: dashboard.visible().len(),
        total: dashboard.activities().len(),
    };

    output::render(output, &report, |report, w| {
        if output.is_pretty() {
            pretty_section(w, "Filter")?;
        }
        pretty_kv(w, "users", join(report.filter.users.iter().map(String::as_str)))?;
        pretty_kv(w, "types", join(report.filter.types.iter().map(|t| t.as_str())))?;
        pretty_kv(w, "projects", join(report.filter.projects.iter().map(String::as_str)))?;
        writeln!(w, "showing {} of {} activities", report.visible, report.total)
    })
}
