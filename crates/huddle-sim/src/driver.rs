//! Async driver that runs a [`MockGenerator`] on a fixed interval.
//!
//! The generator lives inside a spawned task and hands non-quiet
//! [`TickOutcome`]s to the owner over a bounded channel. The owner keeps the
//! [`GeneratorHandle`] for as long as the live view is open.

use std::time::Duration;

use huddle_core::error::ErrorCode;
use huddle_core::live::TickOutcome;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::generator::MockGenerator;
use crate::rng::RandomSource;

const OUTCOME_BUFFER: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("generator task ended abnormally: {0}")]
    Join(#[from] JoinError),
}

impl DriverError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::GeneratorStopped
    }
}

/// Owner's end of a running generator.
///
/// Dropping the handle aborts the task.
#[derive(Debug)]
pub struct GeneratorHandle {
    outcomes: mpsc::Receiver<TickOutcome>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<u64>>,
}

impl GeneratorHandle {
    /// Wait for the next outcome. `None` once the task has ended.
    pub async fn recv(&mut self) -> Option<TickOutcome> {
        self.outcomes.recv().await
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the task and wait for it to finish. Returns the number of ticks
    /// it ran. Outcomes still buffered are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Join`] if the task panicked or was aborted.
    pub async fn stop(mut self) -> Result<u64, DriverError> {
        self.outcomes.close();
        if let Some(stop_tx) = self.stop_tx.take() {
            // Err means the task already exited on its own.
            let _ = stop_tx.send(());
        }
        let Some(task) = self.task.take() else {
            return Ok(0);
        };
        let ticks = task.await?;
        info!(ticks, "generator stopped");
        Ok(ticks)
    }
}

impl Drop for GeneratorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawn `generator` on the current tokio runtime, ticking every `period`.
///
/// The first tick fires one full period after spawning. Must be called from
/// within a runtime.
#[must_use]
pub fn spawn_generator<R, C>(
    generator: MockGenerator<R>,
    clock: C,
    period: Duration,
) -> GeneratorHandle
where
    R: RandomSource + Send + 'static,
    C: Clock + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));
    let (tx, outcomes) = mpsc::channel(OUTCOME_BUFFER);
    let (stop_tx, stop_rx) = oneshot::channel();
    info!(period_ms = period.as_millis(), "generator started");
    let task = tokio::spawn(run(generator, clock, period, tx, stop_rx));
    GeneratorHandle {
        outcomes,
        stop_tx: Some(stop_tx),
        task: Some(task),
    }
}

async fn run<R, C>(
    mut generator: MockGenerator<R>,
    mut clock: C,
    period: Duration,
    tx: mpsc::Sender<TickOutcome>,
    mut stop_rx: oneshot::Receiver<()>,
) -> u64
where
    R: RandomSource,
    C: Clock,
{
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = interval.tick() => {
                let outcome = generator.tick(clock.now());
                if outcome.is_quiet() {
                    continue;
                }
                if tx.send(outcome).await.is_err() {
                    debug!("outcome receiver closed");
                    break;
                }
            }
        }
    }
    generator.ticks()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockSpec, SteppedClock};
    use crate::rng::DeterministicRng;
    use huddle_core::config::GeneratorConfig;
    use huddle_core::seed::Seed;

    fn generator(activity_percent: u8) -> MockGenerator<DeterministicRng> {
        let config = GeneratorConfig {
            activity_percent,
            presence_percent: 0,
            ..GeneratorConfig::default()
        };
        MockGenerator::new(config, DeterministicRng::new(21), Seed::demo().users)
    }

    fn clock() -> SteppedClock {
        SteppedClock::new(ClockSpec::default())
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_outcomes_until_stopped() {
        let mut handle = spawn_generator(generator(100), clock(), Duration::from_secs(7));

        let mut ids = Vec::new();
        for _ in 0..3 {
            let outcome = handle.recv().await.expect("outcome");
            ids.push(outcome.activity.expect("activity").id);
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");

        let ticks = handle.stop().await.expect("clean stop");
        assert!(ticks >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_tick() {
        let handle = spawn_generator(generator(100), clock(), Duration::from_secs(7));
        assert_eq!(handle.stop().await.expect("clean stop"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_generator_delivers_nothing() {
        let mut handle = spawn_generator(generator(0), clock(), Duration::from_secs(7));
        let waited = time::timeout(Duration::from_secs(70), handle.recv()).await;
        assert!(waited.is_err(), "no outcome expected");
        let ticks = handle.stop().await.expect("clean stop");
        assert!(ticks >= 9);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        let mut handle = spawn_generator(generator(100), clock(), Duration::ZERO);
        assert!(handle.recv().await.is_some());
        assert!(!handle.is_finished());
        handle.stop().await.expect("clean stop");
    }
}
