//! Session export files and whole-store backups.
//!
//! Export files hold one pretty-printed [`Session`](crate::session::Session).
//! Backup files wrap every session with a format version and timestamp.
//! Both are read leniently: unknown keys are ignored and missing optional
//! fields take their defaults.

mod backup;
mod export;
mod restore;

pub use backup::{create_backup, read_backup, write_backup, BackupFile, BACKUP_VERSION};
pub use export::{export_session, read_session_file};
pub use restore::{find_conflicts, restore, RestoreStrategy, RestoreSummary, RESTORE_SUFFIX};

use std::path::{Path, PathBuf};

use crate::error::{DevflowError, Result};

/// `<dir>/<name>.devflow.json`
pub fn default_export_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.devflow.json", name))
}

/// `<dir>/devflow-backup-<unix millis>.json`
pub fn default_backup_path(dir: &Path) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    dir.join(format!("devflow-backup-{}.json", millis))
}

/// Read an input file, mapping a missing file to [`DevflowError::FileNotFound`].
fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DevflowError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

fn parse_json(path: &Path, content: &str) -> Result<serde_json::Value> {
    serde_json::from_str(content).map_err(|e| DevflowError::InvalidFileFormat {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
