//! huddle-core library.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` at loading edges and `thiserror` enums at module seams.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Updates**: Activity collections are `Vec<Arc<Activity>>` and are replaced on write,
//!   never edited in place.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod feed;
pub mod live;
pub mod model;
pub mod outline;
pub mod prefs;
pub mod seed;
