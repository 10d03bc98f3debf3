use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use huddle_core::outline::Section;
use serde::Serialize;

use crate::output::{self, OutputMode, pretty_section};

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Jump to a section id and report its emphasis window.
    #[arg(long, value_name = "SECTION")]
    pub jump: Option<String>,
}

#[derive(Debug, Serialize)]
struct OutlineReport {
    sections: Vec<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jumped: Option<Jump>,
}

#[derive(Debug, Serialize)]
struct Jump {
    section: Section,
    position: usize,
    emphasized_until: DateTime<Utc>,
}

pub fn run_outline(
    args: &OutlineArgs,
    output: OutputMode,
    project_root: &Path,
    prefs: Option<&Path>,
) -> Result<()> {
    let mut ws = super::open_workspace(project_root, prefs)?;
    let dashboard = &mut ws.dashboard;
    let now = Utc::now();

    let jumped = match args.jump.as_deref() {
        None => None,
        Some(id) => {
            let Some(section) = dashboard.jump_to_section(id, now).cloned() else {
                bail!("no section '{id}' in the document outline");
            };
            let position = dashboard.outline().position(id).unwrap_or_default();
            let emphasized_until = dashboard.active_emphasis(now).map_or(now, |e| e.until);
            Some(Jump {
                section,
                position,
                emphasized_until,
            })
        }
    };

    let report = OutlineReport {
        sections: dashboard.outline().sections().to_vec(),
        jumped,
    };
    let highlighted = report.jumped.as_ref().map(|j| j.section.id.clone());

    output::render(output, &report, |report, w| {
        if output.is_pretty() {
            pretty_section(w, "Document outline")?;
        }
        for (i, section) in report.sections.iter().enumerate() {
            let marker = if highlighted.as_deref() == Some(section.id.as_str()) { ">" } else { " " };
            writeln!(w, "{marker} {:>2}. {:<24} {}", i + 1, section.label, section.id)?;
        }
        Ok(())
    })
}
