use std::path::Path;

use anyhow::Result;
use clap::Args;
use huddle_core::prefs::Theme;
use serde::Serialize;

use crate::output::{self, OutputMode};

#[derive(Args, Debug)]
pub struct ThemeArgs {
    /// New theme (dark or light). Prints the current theme when omitted.
    #[arg(value_name = "THEME")]
    pub theme: Option<Theme>,
}

#[derive(Debug, Serialize)]
struct ThemeReport {
    theme: Theme,
    changed: bool,
}

pub fn run_theme(
    args: &ThemeArgs,
    output: OutputMode,
    project_root: &Path,
    prefs: Option<&Path>,
) -> Result<()> {
    let mut ws = super::open_workspace(project_root, prefs)?;
    let before = ws.dashboard.theme();
    if let Some(theme) = args.theme {
        ws.dashboard.set_theme(theme);
    }
    let report = ThemeReport {
        theme: ws.dashboard.theme(),
        changed: ws.dashboard.theme() != before,
    };

    output::render(output, &report, |report, w| {
        writeln!(w, "{}", report.theme)
    })
}
