use std::path::Path;

use anyhow::Result;
use huddle_core::feed::{BarScale, TypeSummary};
use huddle_core::model::ActivityType;
use serde::Serialize;

use crate::output::{self, OutputMode, pretty_kv, pretty_section};

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub total: usize,
    pub filtered: bool,
    pub types: Vec<TypeBar>,
}

#[derive(Debug, Serialize)]
pub struct TypeBar {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub label: &'static str,
    pub count: usize,
    pub ratio: f64,
    /// Chart bar height in pixels.
    pub bar: f64,
}

impl SummaryReport {
    pub fn new(summary: &TypeSummary, filtered: bool, scale: BarScale) -> Self {
        Self {
            total: summary.total(),
            filtered,
            types: summary
                .iter()
                .map(|(kind, count)| TypeBar {
                    kind,
                    label: kind.label(),
                    count,
                    ratio: summary.ratio(kind),
                    bar: scale.size(summary, kind),
                })
                .collect(),
        }
    }
}

/// Terminal cells for a bar of `height` pixels: one cell per 4px.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cells(height: f64) -> usize {
    (height / 4.0).round().max(0.0) as usize
}

pub fn run_summary(output: OutputMode, project_root: &Path, prefs: Option<&Path>) -> Result<()> {
    let ws = super::open_workspace(project_root, prefs)?;
    let report = SummaryReport::new(
        &ws.dashboard.summary(),
        ws.dashboard.filter().is_active(),
        BarScale::default(),
    );

    output::render_mode(
        output,
        &report,
        |report, w| {
            for bar in &report.types {
                writeln!(w, "{}\t{}", bar.kind, bar.count)?;
            }
            Ok(())
        },
        |report, w| {
            pretty_section(w, "Activity summary")?;
            for bar in &report.types {
                writeln!(
                    w,
                    "{:<12} {:>4}  {}",
                    bar.label,
                    bar.count,
                    "█".repeat(cells(bar.bar))
                )?;
            }
            pretty_kv(w, "total", report.total.to_string())?;
            if report.filtered {
                writeln!(w, "(filtered; run `hd filter clear` to see everything)")?;
            }
            Ok(())
        },
    )
}
