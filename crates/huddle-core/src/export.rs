//! JSON export of the visible feed.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ErrorCode;
use crate::model::{Activity, ActivityType};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write export to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

impl ExportError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Serialize(_) => ErrorCode::InternalUnexpected,
            Self::Write { .. } => ErrorCode::ExportWriteFailed,
        }
    }
}

/// Top-level export payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: String,
    pub total_activities: usize,
    pub activities: Vec<ExportedActivity>,
}

/// Flattened view of one activity: user name instead of the user record,
/// and reaction counts instead of reactor sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedActivity {
    pub id: String,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub timestamp: String,
    pub content: String,
    pub reactions: BTreeMap<String, usize>,
}

impl From<&Activity> for ExportedActivity {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id.clone(),
            user: activity.user.name.clone(),
            kind: activity.kind,
            timestamp: iso(activity.timestamp),
            content: activity.content.clone(),
            reactions: activity.reactions.counts(),
        }
    }
}

impl ExportDocument {
    /// Snapshot `activities` (normally the filtered view) at `now`.
    #[must_use]
    pub fn build(activities: &[Arc<Activity>], now: DateTime<Utc>) -> Self {
        Self {
            export_date: iso(now),
            total_activities: activities.len(),
            activities: activities
                .iter()
                .map(|a| ExportedActivity::from(a.as_ref()))
                .collect(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document as pretty JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Write`] if the file cannot be created or written.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        let write_err = |source| ExportError::Write {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, self)?;
        out.write_all(b"\n").map_err(write_err)?;
        out.flush().map_err(write_err)?;
        info!(
            path = %path.display(),
            activities = self.total_activities,
            "feed exported"
        );
        Ok(())
    }
}

/// Download name for an export taken at `now`: `workspace-activity-YYYY-MM-DD.json`.
#[must_use]
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("workspace-activity-{}.json", now.format("%Y-%m-%d"))
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
