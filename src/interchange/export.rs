//! Single-session export files.

use std::fs;
use std::path::Path;

use crate::error::{DevflowError, Result};
use crate::session::{Session, SessionDraft};

use super::{parse_json, read_input};

/// Write `session` as pretty JSON to `path`.
pub fn export_session(session: &Session, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(session)
        .map_err(|e| DevflowError::Other(e.into()))?;
    fs::write(path, content)?;
    tracing::debug!("Exported {} to {}", session.name, path.display());
    Ok(())
}

/// Read a session export file.
///
/// The file must be JSON with non-empty `name` and `path` fields.
pub fn read_session_file(path: &Path) -> Result<SessionDraft> {
    let content = read_input(path)?;
    let value = parse_json(path, &content)?;

    let draft: SessionDraft =
        serde_json::from_value(value).map_err(|e| DevflowError::InvalidFileFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let has_name = draft.name.as_deref().is_some_and(|n| !n.is_empty());
    let has_path = draft.path.as_ref().is_some_and(|p| !p.as_os_str().is_empty());
    if !has_name || !has_path {
        return Err(DevflowError::MissingFields {
            path: path.to_path_buf(),
        });
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Editor;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn session() -> Session {
        let now = chrono::Utc::now();
        Session {
            name: "api".into(),
            path: PathBuf::from("/work/api"),
            editor: Some(Editor::Cursor),
            commands: vec!["npm run dev".into()],
            git: None,
            env: BTreeMap::from([("PORT".to_string(), "3000".to_string())]),
            template: "custom".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn exported_file_reads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("api.devflow.json");

        export_session(&session(), &path).unwrap();
        let draft = read_session_file(&path).unwrap();

        assert_eq!(draft.name.as_deref(), Some("api"));
        assert_eq!(draft.editor, Some(Editor::Cursor));
        assert_eq!(draft.env.unwrap()["PORT"], "3000");
        assert!(fs::read_to_string(&path).unwrap().contains("\n  \"name\""));
    }

    #[test]
    fn missing_name_or_path_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.json");
        fs::write(&path, r#"{"name": "api", "commands": []}"#).unwrap();

        let err = read_session_file(&path).unwrap_err();
        assert!(matches!(err, DevflowError::MissingFields { .. }));
        assert!(err.to_string().contains("Required fields: name, path"));
    }

    #[test]
    fn malformed_json_is_invalid_format() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_session_file(&path).unwrap_err();
        assert!(matches!(err, DevflowError::InvalidFileFormat { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = read_session_file(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DevflowError::FileNotFound { .. }));
    }
}
