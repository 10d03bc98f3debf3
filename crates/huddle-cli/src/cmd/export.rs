use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use huddle_core::export::export_file_name;
use serde::Serialize;

use crate::output::{self, OutputMode};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output path (defaults to `workspace-activity-<date>.json` in the
    /// current directory). Use `-` for stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    path: String,
    total_activities: usize,
}

pub fn run_export(
    args: &ExportArgs,
    output: OutputMode,
    project_root: &Path,
    prefs: Option<&Path>,
) -> Result<()> {
    let ws = super::open_workspace(project_root, prefs)?;
    let now = Utc::now();
    let document = ws.dashboard.export(now);

    if args.output.as_deref() == Some(Path::new("-")) {
        let json = document.to_json().context("failed to serialize export")?;
        println!("{json}");
        return Ok(());
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| project_root.join(export_file_name(now)));
    document
        .write_to(&path)
        .with_context(|| format!("failed to write export to {}", path.display()))?;

    let report = ExportReport {
        path: path.display().to_string(),
        total_activities: document.total_activities,
    };
    output::render(output, &report, |report, w| {
        writeln!(
            w,
            "exported {} activities to {}",
            report.total_activities, report.path
        )
    })
}
