//! JSON file store.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DevflowError, Result};

use super::{DocumentStore, StoreDocument};

/// Store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store at the given file path. Nothing is touched on disk
    /// until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn store_error(&self, message: impl ToString) -> DevflowError {
        DevflowError::Store {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<StoreDocument> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.store_error(e))?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| self.store_error(format!("Failed to parse store: {}", e)))
    }

    /// Save the document using atomic write.
    ///
    /// Writes to a temp file and renames it over the store so the document
    /// is never left partially written.
    fn save(&self, document: &StoreDocument) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.store_error(e))?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| self.store_error(format!("Failed to serialize store: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).map_err(|e| self.store_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.store_error(e))?;

        tracing::debug!("Saved store to {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_file_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("config.json"));

        let doc = store.load().unwrap();
        assert_eq!(doc, StoreDocument::default());
    }

    #[test]
    fn save_creates_parent_dirs_and_round_trips() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("nested").join("config.json"));

        let mut doc = StoreDocument::default();
        doc.last_used = "api".to_string();
        doc.analytics.total_starts = 3;
        store.save(&doc).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.last_used, "api");
        assert_eq!(loaded.analytics.total_starts, 3);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let store = JsonFileStore::new(&path);

        store.save(&StoreDocument::default()).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, DevflowError::Store { .. }));
        assert!(err.to_string().contains("Failed to parse store"));
    }

    #[test]
    fn unknown_editor_does_not_break_the_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"sessions": {
                "api": {"name": "api", "path": "/tmp/api", "editor": "emacs"},
                "web": {"name": "web", "path": "/tmp/web", "editor": "code"}
            }}"#,
        )
        .unwrap();

        let doc = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(doc.sessions["api"].editor, None);
        assert!(doc.sessions["web"].editor.is_some());
    }

    #[test]
    fn empty_file_loads_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "").unwrap();

        let doc = JsonFileStore::new(&path).load().unwrap();
        assert!(doc.sessions.is_empty());
    }

    #[test]
    fn location_reports_path() {
        let store = JsonFileStore::new("/tmp/devflow/config.json");
        assert_eq!(
            store.location(),
            Some(Path::new("/tmp/devflow/config.json"))
        );
    }
}
