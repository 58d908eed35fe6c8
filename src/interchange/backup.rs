//! Whole-store backup files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DevflowError, Result};
use crate::session::{Session, SessionDraft};

use super::{parse_json, read_input};

/// Format version written into new backups.
pub const BACKUP_VERSION: &str = "1.0.0";

/// On-disk backup layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub session_count: usize,
    pub sessions: BTreeMap<String, SessionDraft>,
}

/// Snapshot `sessions` into a backup.
pub fn create_backup(sessions: &BTreeMap<String, Session>) -> BackupFile {
    BackupFile {
        version: BACKUP_VERSION.to_string(),
        exported_at: Some(Utc::now()),
        session_count: sessions.len(),
        sessions: sessions
            .iter()
            .map(|(name, s)| (name.clone(), SessionDraft::from(s.clone())))
            .collect(),
    }
}

pub fn write_backup(backup: &BackupFile, path: &Path) -> Result<()> {
    let content =
        serde_json::to_string_pretty(backup).map_err(|e| DevflowError::Other(e.into()))?;
    fs::write(path, content)?;
    tracing::debug!(
        "Wrote backup of {} session(s) to {}",
        backup.session_count,
        path.display()
    );
    Ok(())
}

/// Read a backup file. `sessions` must be a JSON object.
pub fn read_backup(path: &Path) -> Result<BackupFile> {
    let content = read_input(path)?;
    let value = parse_json(path, &content)?;

    let invalid = |message: String| DevflowError::InvalidFileFormat {
        path: path.to_path_buf(),
        message,
    };

    if !value.get("sessions").is_some_and(|s| s.is_object()) {
        return Err(invalid("\"sessions\" must be an object".to_string()));
    }

    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
}
