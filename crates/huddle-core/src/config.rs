use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::seed::default_projects;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub feed: FeedSection,
    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Timing and odds for the mock activity generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Chance per tick (percent) of synthesizing a new activity.
    #[serde(default = "default_activity_percent")]
    pub activity_percent: u8,
    /// Chance per tick (percent) of reshuffling presence.
    #[serde(default = "default_presence_percent")]
    pub presence_percent: u8,
    /// Chance (percent) that each user flips during a presence reshuffle.
    #[serde(default = "default_presence_flip_percent")]
    pub presence_flip_percent: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            activity_percent: default_activity_percent(),
            presence_percent: default_presence_percent(),
            presence_flip_percent: default_presence_flip_percent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSection {
    /// Identity recorded when the local viewer reacts.
    #[serde(default = "default_viewer")]
    pub viewer: String,
    #[serde(default = "default_projects")]
    pub projects: Vec<String>,
    /// Optional JSON seed file replacing the built-in demo workspace.
    #[serde(default)]
    pub seed: Option<PathBuf>,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            viewer: default_viewer(),
            projects: default_projects(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl PreferencesConfig {
    /// Preference file location: the configured path, else
    /// `<config dir>/huddle/preferences.json`.
    #[must_use]
    pub fn resolve_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(|| dirs::config_dir().map(|dir| dir.join("huddle/preferences.json")))
    }
}

/// Load `.huddle/config.toml` under `project_root`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_feed_config(project_root: &Path) -> Result<FeedConfig> {
    let path = project_root.join(".huddle/config.toml");
    if !path.exists() {
        return Ok(FeedConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut config = toml::from_str::<FeedConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    // Relative paths are resolved against the project root.
    config.feed.seed = config.feed.seed.take().map(|seed| anchor(project_root, seed));
    config.preferences.path = config
        .preferences
        .path
        .take()
        .map(|path| anchor(project_root, path));

    Ok(config)
}

fn anchor(project_root: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        project_root.join(path)
    } else {
        path
    }
}

const fn default_interval_ms() -> u64 {
    7_000
}

const fn default_activity_percent() -> u8 {
    30
}

const fn default_presence_percent() -> u8 {
    10
}

const fn default_presence_flip_percent() -> u8 {
    50
}

fn default_viewer() -> String {
    "current-user".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(root: &Path, body: &str) {
        let dir = root.join(".huddle");
        std::fs::create_dir_all(&dir).expect("config dir must be created");
        std::fs::write(dir.join("config.toml"), body).expect("config must be written");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_feed_config(dir.path()).expect("defaults");
        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.generator.interval_ms, 7_000);
        assert_eq!(config.generator.activity_percent, 30);
        assert_eq!(config.feed.viewer, "current-user");
        assert_eq!(config.feed.projects.len(), 4);
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(
            dir.path(),
            "[generator]\nactivity_percent = 100\n\n[feed]\nseed = \"seed.json\"\n",
        );
        let config = load_feed_config(dir.path()).expect("parse");
        assert_eq!(config.generator.activity_percent, 100);
        assert_eq!(config.generator.presence_percent, 10);
        assert_eq!(config.feed.seed, Some(dir.path().join("seed.json")));
        assert_eq!(config.feed.viewer, "current-user");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(dir.path(), "[generator\ninterval_ms = ");
        let err = load_feed_config(dir.path()).expect_err("parse error");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn relative_preference_path_is_anchored_at_project_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_config(dir.path(), "[preferences]\npath = \".huddle/prefs.json\"\n");
        let config = load_feed_config(dir.path()).expect("parse");
        assert_eq!(
            config.preferences.resolve_path(),
            Some(dir.path().join(".huddle/prefs.json"))
        );
    }

    #[test]
    fn explicit_preference_path_wins() {
        let prefs = PreferencesConfig {
            path: Some(PathBuf::from("/tmp/prefs.json")),
        };
        assert_eq!(prefs.resolve_path(), Some(PathBuf::from("/tmp/prefs.json")));
    }
}
