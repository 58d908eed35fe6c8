//! Start counters and favorites.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Usage analytics for the whole store.
///
/// Names that no longer match a session are kept; consumers filter them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analytics {
    pub total_starts: u64,
    pub session_starts: BTreeMap<String, u64>,
    pub last_start_times: BTreeMap<String, DateTime<Utc>>,
    pub favorites: Vec<String>,
}

/// Start statistics for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub starts: u64,
    pub last_started: Option<DateTime<Utc>>,
}

impl Analytics {
    /// Count one start of `name` at `at`.
    pub fn record_start(&mut self, name: &str, at: DateTime<Utc>) {
        self.total_starts += 1;
        *self.session_starts.entry(name.to_string()).or_insert(0) += 1;
        self.last_start_times.insert(name.to_string(), at);
    }

    pub fn stats(&self, name: &str) -> SessionStats {
        SessionStats {
            starts: self.session_starts.get(name).copied().unwrap_or(0),
            last_started: self.last_start_times.get(name).copied(),
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|f| f == name)
    }

    /// Append to favorites. Returns false if already present.
    pub fn add_favorite(&mut self, name: &str) -> bool {
        if self.is_favorite(name) {
            return false;
        }
        self.favorites.push(name.to_string());
        true
    }

    /// Remove from favorites. Returns false if absent.
    pub fn remove_favorite(&mut self, name: &str) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|f| f != name);
        self.favorites.len() != before
    }

    /// Sessions by start count, highest first. Ties sort by name.
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked: Vec<(String, u64)> = self
            .session_starts
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }
}
