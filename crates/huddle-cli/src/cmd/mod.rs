pub mod completions;
pub mod export;
pub mod feed;
pub mod filter;
pub mod live;
pub mod outline;
pub mod summary;
pub mod theme;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use huddle_core::config::{FeedConfig, load_feed_config};
use huddle_core::dashboard::Dashboard;
use huddle_core::prefs::{JsonFileStore, MemoryStore, PreferenceStore};
use huddle_core::seed::Seed;
use tracing::{debug, warn};

/// Loaded config plus a dashboard built from it.
pub struct Workspace {
    pub config: FeedConfig,
    pub dashboard: Dashboard,
}

/// Load `.huddle/config.toml`, the seed, and the preference store, and build
/// the dashboard. `prefs_override` replaces the configured preference path.
pub fn open_workspace(project_root: &Path, prefs_override: Option<&Path>) -> Result<Workspace> {
    let config = load_feed_config(project_root)?;

    let mut seed = match config.feed.seed.as_deref() {
        Some(path) => Seed::load(path)
            .with_context(|| format!("failed to load seed {}", path.display()))?,
        None => Seed::demo(),
    };
    if seed.projects.is_empty() || config.feed.seed.is_none() {
        seed.projects.clone_from(&config.feed.projects);
    }

    let prefs_path = prefs_override
        .map(Path::to_path_buf)
        .or_else(|| config.preferences.resolve_path());
    let store = open_store(prefs_path);

    let dashboard = Dashboard::new(seed, config.feed.viewer.clone(), store);
    Ok(Workspace { config, dashboard })
}

fn open_store(path: Option<PathBuf>) -> Box<dyn PreferenceStore + Send> {
    let Some(path) = path else {
        warn!("no preference location available, preferences kept in memory");
        return Box::new(MemoryStore::new());
    };
    match JsonFileStore::open(&path) {
        Ok(store) => {
            debug!(path = %path.display(), "preference store opened");
            Box::new(store)
        }
        Err(err) => {
            warn!(code = %err.code(), error = %err, "preferences unavailable, kept in memory");
            Box::new(MemoryStore::new())
        }
    }
}
