use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use huddle_core::dashboard::Dashboard;
use huddle_core::live::{PresenceChange, TickOutcome};
use huddle_sim::{
    Clock, ClockSpec, DeterministicRng, MockGenerator, RandomSource, SteppedClock, SystemClock,
    ThreadRandom, spawn_generator,
};
use serde::Serialize;
use tracing::info;

use super::feed::FeedRow;
use crate::output::{OutputMode, render_json_line};

#[derive(Args, Debug)]
pub struct LiveArgs {
    /// Stop after this many non-quiet ticks.
    #[arg(long, default_value_t = 5, value_name = "N")]
    pub ticks: u64,

    /// Tick interval in milliseconds (defaults to `[generator] interval_ms`).
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Seed a deterministic random source and a stepped clock.
    #[arg(long, value_name = "S")]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct LiveEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    activity: Option<FeedRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    presence: Vec<PresenceChange>,
}

#[derive(Debug, Serialize)]
struct LiveSummary {
    delivered: u64,
    ticks: u64,
    activities: usize,
    online: usize,
}

pub fn run_live(
    args: &LiveArgs,
    output: OutputMode,
    project_root: &Path,
    prefs: Option<&Path>,
) -> Result<()> {
    let mut ws = super::open_workspace(project_root, prefs)?;
    let config = ws.config.generator;
    let interval_ms = args.interval_ms.unwrap_or(config.interval_ms);
    let period = Duration::from_millis(interval_ms);
    let roster = ws.dashboard.users().to_vec();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")?;

    let (delivered, ticks) = match args.seed {
        Some(seed) => {
            let generator = MockGenerator::new(config, DeterministicRng::new(seed), roster);
            let clock = SteppedClock::new(ClockSpec {
                tick_millis: i64::try_from(interval_ms).unwrap_or(i64::MAX),
                ..ClockSpec::default()
            });
            runtime.block_on(drive(generator, clock, period, args.ticks, &mut ws.dashboard, output))?
        }
        None => {
            let generator = MockGenerator::new(config, ThreadRandom::from_entropy(), roster);
            runtime.block_on(drive(
                generator,
                SystemClock,
                period,
                args.ticks,
                &mut ws.dashboard,
                output,
            ))?
        }
    };

    let summary = LiveSummary {
        delivered,
        ticks,
        activities: ws.dashboard.activities().len(),
        online: ws.dashboard.users().iter().filter(|u| u.online).count(),
    };
    let mut out = io::stdout();
    if output.is_json() {
        render_json_line(&mut out, &summary)?;
    } else {
        writeln!(
            out,
            "stopped after {} ticks ({} delivered): {} activities, {} online",
            summary.ticks, summary.delivered, summary.activities, summary.online
        )?;
    }
    Ok(())
}

async fn drive<R, C>(
    generator: MockGenerator<R>,
    clock: C,
    period: Duration,
    wanted: u64,
    dashboard: &mut Dashboard,
    output: OutputMode,
) -> Result<(u64, u64)>
where
    R: RandomSource + Send + 'static,
    C: Clock + Send + 'static,
{
    let mut handle = spawn_generator(generator, clock, period);
    let mut delivered = 0;
    while delivered < wanted {
        let Some(outcome) = handle.recv().await else {
            break;
        };
        delivered += 1;
        let event = event_for(dashboard, outcome);
        print_event(&event, dashboard, output)?;
    }

    let ticks = handle
        .stop()
        .await
        .map_err(|err| anyhow!("{err} [{}]", err.code()))?;
    info!(delivered, ticks, "live run finished");
    Ok((delivered, ticks))
}

/// Apply `outcome` and describe it against the updated dashboard.
///
/// Ages are measured on the generator's clock: a new activity is stamped
/// with that clock's reading, so it is the row's own "now".
fn event_for(dashboard: &mut Dashboard, outcome: TickOutcome) -> LiveEvent {
    let presence = outcome.presence.clone();
    let new_id = outcome.activity.as_ref().map(|a| a.id.clone());
    dashboard.apply_tick(outcome);

    let activity = new_id.and_then(|id| {
        dashboard
            .activities()
            .iter()
            .find(|a| a.id == id)
            .map(|a| FeedRow::new(a, dashboard.project_of(a), a.timestamp))
    });
    LiveEvent { activity, presence }
}

fn print_event(event: &LiveEvent, dashboard: &Dashboard, output: OutputMode) -> Result<()> {
    let mut out = io::stdout();
    match output {
        OutputMode::Json => render_json_line(&mut out, event)?,
        OutputMode::Text => {
            if let Some(row) = &event.activity {
                row.write_text(&mut out)?;
            }
            for change in &event.presence {
                writeln!(out, "presence\t{}\t{}\t{}", change.user_id, change.online, change.editing)?;
            }
        }
        OutputMode::Pretty => {
            if let Some(row) = &event.activity {
                row.write_pretty(&mut out)?;
            }
            for change in &event.presence {
                if let Some(user) = dashboard.users().iter().find(|u| u.id == change.user_id) {
                    writeln!(out, "  · {} is now {}", user.name, user.presence_label())?;
                }
            }
        }
    }
    out.flush()?;
    Ok(())
}
