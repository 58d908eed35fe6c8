//! Restoring backups into a repository.

use std::fmt;

use crate::error::Result;
use crate::session::SessionRepository;

use super::BackupFile;

/// Suffix appended to a session name by [`RestoreStrategy::Rename`].
pub const RESTORE_SUFFIX: &str = "-restored";

/// How to treat backup sessions whose name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RestoreStrategy {
    /// Keep the existing session.
    Skip,
    /// Replace the existing session.
    Overwrite,
    /// Restore as `<name>-restored` alongside the existing one.
    Rename,
    /// Abort without writing anything.
    Cancel,
}

impl RestoreStrategy {
    pub const ALL: [RestoreStrategy; 4] = [
        RestoreStrategy::Skip,
        RestoreStrategy::Overwrite,
        RestoreStrategy::Rename,
        RestoreStrategy::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreStrategy::Skip => "skip",
            RestoreStrategy::Overwrite => "overwrite",
            RestoreStrategy::Rename => "rename",
            RestoreStrategy::Cancel => "cancel",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            RestoreStrategy::Skip => "Skip existing sessions",
            RestoreStrategy::Overwrite => "Overwrite existing sessions",
            RestoreStrategy::Rename => "Rename conflicting sessions",
            RestoreStrategy::Cancel => "Cancel restore",
        }
    }
}

impl fmt::Display for RestoreStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RestoreStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s.trim())
            .ok_or_else(|| format!("unknown restore strategy '{}'", s))
    }
}

/// What a restore did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Names written, after any rename.
    pub restored: Vec<String>,
    pub skipped: Vec<String>,
    pub cancelled: bool,
}

/// Backup session names that already exist in the repository.
pub fn find_conflicts(repository: &SessionRepository, backup: &BackupFile) -> Result<Vec<String>> {
    let existing = repository.get_all()?;
    Ok(backup
        .sessions
        .keys()
        .filter(|name| existing.contains_key(*name))
        .cloned()
        .collect())
}

/// Restore every session in `backup`.
///
/// `strategy` only applies to conflicting names. Without conflicts every
/// session is restored, even under [`RestoreStrategy::Cancel`].
pub fn restore(
    repository: &SessionRepository,
    backup: &BackupFile,
    strategy: RestoreStrategy,
) -> Result<RestoreSummary> {
    let conflicts = find_conflicts(repository, backup)?;
    let mut summary = RestoreSummary::default();

    if !conflicts.is_empty() && strategy == RestoreStrategy::Cancel {
        summary.cancelled = true;
        return Ok(summary);
    }

    for (name, draft) in &backup.sessions {
        let mut draft = draft.clone();
        let target = if conflicts.contains(name) {
            match strategy {
                RestoreStrategy::Skip => {
                    summary.skipped.push(name.clone());
                    continue;
                }
                RestoreStrategy::Rename => format!("{}{}", name, RESTORE_SUFFIX),
                _ => name.clone(),
            }
        } else {
            name.clone()
        };

        draft.name = Some(target.clone());
        repository.save(&target, draft)?;
        summary.restored.push(target);
    }

    tracing::info!(
        "Restored {} session(s), skipped {}",
        summary.restored.len(),
        summary.skipped.len()
    );
    Ok(summary)
}
