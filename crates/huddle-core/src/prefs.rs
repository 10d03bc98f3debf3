//! Persisted UI preferences: theme, filter selection, and the landing flag.
//!
//! Preferences live in a flat string key-value store. They are read once
//! when a dashboard starts and written back whenever they change. A missing
//! or unreadable value silently falls back to its default.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::{fmt, io, str::FromStr};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::model::Filter;

pub const THEME_KEY: &str = "theme";
pub const FILTER_KEY: &str = "workspace-filters";
pub const LANDING_KEY: &str = "landing-visited";

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("failed to read preferences at {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write preferences at {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PreferenceError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::PreferenceReadFailed,
            Self::Write { .. } => ErrorCode::PreferenceWriteFailed,
            Self::Encode(_) => ErrorCode::InternalUnexpected,
        }
    }
}

/// String key-value storage for preferences.
pub trait PreferenceStore {
    /// Stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError`] if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Volatile store, used by tests and one-shot CLI runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk.
///
/// Every `set` holds an exclusive advisory lock on a sibling `.lock` file,
/// re-reads the file, merges the one changed key and rewrites it. Keys
/// written by other stores on the same path survive.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts empty; a corrupt
    /// file is logged and also starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::Read`] if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = read_values(&path)?;
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: io::Error) -> PreferenceError {
        PreferenceError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn merge_and_persist(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.write_err(err))?;
        }

        let lock_path = self.path.with_extension("lock");
        let lock = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|err| self.write_err(err))?;
        lock.lock_exclusive().map_err(|err| self.write_err(err))?;

        let result = self.write_locked(key, value);
        let _ = FileExt::unlock(&lock);
        result
    }

    fn write_locked(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut merged = read_values(&self.path)?;
        merged.insert(key.to_string(), value.to_string());

        let body = serde_json::to_string_pretty(&merged)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|err| self.write_err(err))?;

        debug!(path = %self.path.display(), key, keys = merged.len(), "preferences written");
        self.values = merged;
        Ok(())
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, PreferenceError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "corrupt preferences file, using defaults");
            BTreeMap::new()
        })),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(source) => Err(PreferenceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.merge_and_persist(key, value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme '{other}' (expected dark or light)")),
        }
    }
}

/// Decoded preference values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub filter: Filter,
    pub landing_visited: bool,
}

impl Preferences {
    /// Decode every preference from `store`, falling back per key.
    #[must_use]
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let theme = store.get(THEME_KEY).map_or_else(Theme::default, |raw| {
            raw.parse().unwrap_or_else(|err| {
                warn!(key = THEME_KEY, error = %err, "ignoring stored theme");
                Theme::default()
            })
        });

        let filter = store.get(FILTER_KEY).map_or_else(Filter::default, |raw| {
            serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(key = FILTER_KEY, error = %err, "ignoring stored filter");
                Filter::default()
            })
        });

        let landing_visited = store
            .get(LANDING_KEY)
            .is_some_and(|raw| raw.trim().eq_ignore_ascii_case("true"));

        debug!(%theme, filter_active = filter.is_active(), landing_visited, "preferences loaded");
        Self {
            theme,
            filter,
            landing_visited,
        }
    }
}

/// Persist `theme`.
///
/// # Errors
///
/// Propagates the store's write error.
pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<(), PreferenceError> {
    store.set(THEME_KEY, theme.as_str())
}

/// Persist `filter` as a JSON object of string arrays.
///
/// # Errors
///
/// Propagates encoding or store write errors.
pub fn save_filter(store: &mut dyn PreferenceStore, filter: &Filter) -> Result<(), PreferenceError> {
    let raw = serde_json::to_string(filter)?;
    store.set(FILTER_KEY, &raw)
}

/// Persist the landing flag.
///
/// # Errors
///
/// Propagates the store's write error.
pub fn save_landing_visited(
    store: &mut dyn PreferenceStore,
    visited: bool,
) -> Result<(), PreferenceError> {
    store.set(LANDING_KEY, if visited { "true" } else { "false" })
}
