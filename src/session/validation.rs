//! Session draft validation.

use serde::Serialize;

use crate::error::{DevflowError, Result};

use super::SessionDraft;

/// Outcome of validating a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Convert into a validation error when invalid.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(DevflowError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Check that a draft names a session and points at an existing path.
///
/// Path existence is checked once against the filesystem; nothing stops the
/// directory disappearing afterwards.
pub fn validate(draft: &SessionDraft) -> ValidationReport {
    let mut errors = Vec::new();

    if draft.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
        errors.push("Session name is required".to_string());
    }

    match draft.path.as_deref() {
        Some(path) if !path.as_os_str().is_empty() => {
            if !path.exists() {
                errors.push(format!("Path does not exist: {}", path.display()));
            }
        }
        _ => errors.push("Project path is required".to_string()),
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn valid_draft_passes() {
        let temp = TempDir::new().unwrap();
        let draft = SessionDraft {
            name: Some("api".into()),
            path: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let report = validate(&draft);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn empty_draft_reports_name_and_path() {
        let report = validate(&SessionDraft::default());
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec!["Session name is required", "Project path is required"]
        );
    }

    #[test]
    fn blank_name_is_missing() {
        let temp = TempDir::new().unwrap();
        let draft = SessionDraft {
            name: Some("   ".into()),
            path: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(validate(&draft).errors, vec!["Session name is required"]);
    }

    #[test]
    fn nonexistent_path_differs_from_missing_path() {
        let draft = SessionDraft {
            name: Some("api".into()),
            path: Some(PathBuf::from("/definitely/not/here")),
            ..Default::default()
        };
        let report = validate(&draft);
        assert_eq!(report.errors, vec!["Path does not exist: /definitely/not/here"]);

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, DevflowError::Validation { .. }));
    }
}
