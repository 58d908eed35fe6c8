//! In-memory store for tests and dry runs.

use std::cell::{Cell, RefCell};
use std::path::Path;

use crate::error::{DevflowError, Result};

use super::{DocumentStore, StoreDocument};

/// Store that keeps the document in memory.
///
/// Writes can be made to fail so callers can exercise store I/O error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<StoreDocument>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a document.
    pub fn with_document(document: StoreDocument) -> Self {
        Self {
            document: RefCell::new(document),
            ..Default::default()
        }
    }

    /// Make every subsequent save fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Current document contents.
    pub fn snapshot(&self) -> StoreDocument {
        self.document.borrow().clone()
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<StoreDocument> {
        Ok(self.document.borrow().clone())
    }

    fn save(&self, document: &StoreDocument) -> Result<()> {
        if self.fail_writes.get() {
            return Err(DevflowError::Store {
                path: "<memory>".into(),
                message: "write rejected".to_string(),
            });
        }
        *self.document.borrow_mut() = document.clone();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        let mut doc = StoreDocument::default();
        doc.last_used = "web".into();

        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap().last_used, "web");
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn failing_writes_surface_store_error() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let err = store.save(&StoreDocument::default()).unwrap_err();
        assert!(matches!(err, DevflowError::Store { .. }));
        assert_eq!(store.write_count(), 0);
    }
}
