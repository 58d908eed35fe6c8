//! Persistent document storage.
//!
//! All devflow state lives in one JSON document with four top-level keys:
//! `sessions`, `lastUsed`, `analytics` and `settings`. Every key is optional
//! on disk; missing keys take their schema defaults when the document is
//! loaded.
//!
//! The [`DocumentStore`] trait is injected into
//! [`SessionRepository`](crate::session::SessionRepository) so tests can swap
//! the file-backed [`JsonFileStore`] for a [`MemoryStore`].

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{Analytics, Session, Settings};

/// Application identifier used for the per-user config directory.
pub const APP_ID: &str = "devflow";

/// The complete persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreDocument {
    /// Sessions keyed by name.
    pub sessions: BTreeMap<String, Session>,
    /// Name of the most recently started session (empty if none).
    pub last_used: String,
    /// Start counters and favorites.
    pub analytics: Analytics,
    /// Global settings.
    pub settings: Settings,
}

/// Storage backend for the persisted document.
///
/// Implementations perform whole-document reads and writes. There is no
/// locking: two processes racing on the same store resolve last-writer-wins.
pub trait DocumentStore {
    /// Load the document, applying defaults for anything missing.
    fn load(&self) -> Result<StoreDocument>;

    /// Replace the stored document.
    fn save(&self, document: &StoreDocument) -> Result<()>;

    /// Location of the backing file, if there is one.
    fn location(&self) -> Option<&Path>;
}

/// Get the default store path (`<config dir>/devflow/config.json`).
pub fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_ID)
        .join("config.json")
}
