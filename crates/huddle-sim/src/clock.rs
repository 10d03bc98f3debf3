use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall clock consulted once per generator tick.
pub trait Clock {
    fn now(&mut self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-step clock layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSpec {
    /// Base timestamp in milliseconds.
    pub base_millis: i64,
    /// Milliseconds added per reading.
    pub tick_millis: i64,
}

impl Default for ClockSpec {
    fn default() -> Self {
        Self {
            base_millis: 1_719_489_600_000,
            tick_millis: 7_000,
        }
    }
}

/// Clock that advances by a fixed step on every reading, with freeze controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SteppedClock {
    spec: ClockSpec,
    round: u64,
    frozen_at: Option<i64>,
}

impl SteppedClock {
    #[must_use]
    pub const fn new(spec: ClockSpec) -> Self {
        Self {
            spec,
            round: 0,
            frozen_at: None,
        }
    }

    #[must_use]
    pub const fn spec(&self) -> ClockSpec {
        self.spec
    }

    /// Wall time in milliseconds for a given round.
    #[must_use]
    pub fn millis_at(&self, round: u64) -> i64 {
        if let Some(frozen) = self.frozen_at {
            return frozen;
        }
        let round_i64 = i64::try_from(round).unwrap_or(i64::MAX);
        self.spec
            .base_millis
            .saturating_add(self.spec.tick_millis.saturating_mul(round_i64))
    }

    /// Freeze this clock at its next reading.
    pub fn freeze(&mut self) {
        self.frozen_at = Some(self.millis_at(self.round));
    }

    pub const fn unfreeze(&mut self) {
        self.frozen_at = None;
    }

    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }
}

impl Clock for SteppedClock {
    fn now(&mut self) -> DateTime<Utc> {
        let millis = self.millis_at(self.round);
        self.round = self.round.saturating_add(1);
        DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
    }
}
