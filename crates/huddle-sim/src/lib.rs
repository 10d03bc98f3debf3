//! huddle-sim library.
//!
//! Synthesizes workspace activity and presence changes on a timer.
//!
//! # Conventions
//!
//! - **Randomness**: Every random draw goes through [`rng::RandomSource`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod clock;
pub mod driver;
pub mod generator;
pub mod rng;

pub use clock::{Clock, ClockSpec, SteppedClock, SystemClock};
pub use driver::{DriverError, GeneratorHandle, spawn_generator};
pub use generator::MockGenerator;
pub use rng::{DeterministicRng, RandomSource, ScriptedRandom, ThreadRandom};
