//! CRUD and query operations over the persisted document.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::store::{DocumentStore, StoreDocument};

use super::{
    validation, Analytics, Session, SessionDraft, SessionStats, SettingKey, Settings,
    ValidationReport, CUSTOM_TEMPLATE,
};

/// Session repository backed by an injected document store.
///
/// Every operation is a whole-document read-modify-write. Nothing is cached
/// between calls, so each call observes the latest persisted state.
pub struct SessionRepository {
    store: Box<dyn DocumentStore>,
}

impl SessionRepository {
    pub fn new(store: Box<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Location of the backing store, if file-backed.
    pub fn location(&self) -> Option<&Path> {
        self.store.location()
    }

    fn update<T>(&self, f: impl FnOnce(&mut StoreDocument) -> T) -> Result<T> {
        let mut doc = self.store.load()?;
        let out = f(&mut doc);
        self.store.save(&doc)?;
        Ok(out)
    }

    pub fn get_all(&self) -> Result<BTreeMap<String, Session>> {
        Ok(self.store.load()?.sessions)
    }

    pub fn get(&self, name: &str) -> Result<Option<Session>> {
        Ok(self.store.load()?.sessions.remove(name))
    }

    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.store.load()?.sessions.contains_key(name))
    }

    /// Upsert a session under `name`.
    ///
    /// `createdAt` comes from the existing record, then the draft, then now.
    /// `updatedAt` is always refreshed and never moves backwards. No
    /// validation happens here.
    pub fn save(&self, name: &str, draft: SessionDraft) -> Result<Session> {
        let session = self.update(|doc| {
            let now = Utc::now();
            let existing = doc.sessions.get(name);
            let created_at = existing
                .map(|s| s.created_at)
                .or(draft.created_at)
                .unwrap_or(now);
            let updated_at = existing.map_or(now, |s| s.updated_at.max(now));

            let session = Session {
                name: name.to_string(),
                path: draft.path.unwrap_or_default(),
                editor: draft.editor,
                commands: draft.commands.unwrap_or_default(),
                git: draft.git,
                env: draft.env.unwrap_or_default(),
                template: draft
                    .template
                    .unwrap_or_else(|| CUSTOM_TEMPLATE.to_string()),
                created_at,
                updated_at,
            };
            doc.sessions.insert(name.to_string(), session.clone());
            session
        })?;

        tracing::debug!("Saved session {}", name);
        Ok(session)
    }

    /// Remove a session and drop it from favorites.
    ///
    /// Start counters are left in place. Returns false without writing when
    /// the session does not exist.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let mut doc = self.store.load()?;
        if doc.sessions.remove(name).is_none() {
            return Ok(false);
        }
        doc.analytics.remove_favorite(name);
        self.store.save(&doc)?;

        tracing::debug!("Deleted session {}", name);
        Ok(true)
    }

    pub fn set_last_used(&self, name: &str) -> Result<()> {
        self.update(|doc| doc.last_used = name.to_string())
    }

    /// Last used session name, empty if unset.
    pub fn get_last_used(&self) -> Result<String> {
        Ok(self.store.load()?.last_used)
    }

    /// Record one start of `name` in a single read-modify-write.
    pub fn record_start(&self, name: &str) -> Result<()> {
        self.update(|doc| doc.analytics.record_start(name, Utc::now()))
    }

    pub fn session_stats(&self, name: &str) -> Result<SessionStats> {
        Ok(self.store.load()?.analytics.stats(name))
    }

    pub fn get_analytics(&self) -> Result<Analytics> {
        Ok(self.store.load()?.analytics)
    }

    pub fn add_favorite(&self, name: &str) -> Result<bool> {
        let mut doc = self.store.load()?;
        if !doc.analytics.add_favorite(name) {
            return Ok(false);
        }
        self.store.save(&doc)?;
        Ok(true)
    }

    pub fn remove_favorite(&self, name: &str) -> Result<bool> {
        let mut doc = self.store.load()?;
        if !doc.analytics.remove_favorite(name) {
            return Ok(false);
        }
        self.store.save(&doc)?;
        Ok(true)
    }

    pub fn is_favorite(&self, name: &str) -> Result<bool> {
        Ok(self.store.load()?.analytics.is_favorite(name))
    }

    pub fn get_favorites(&self) -> Result<Vec<String>> {
        Ok(self.store.load()?.analytics.favorites)
    }

    /// Flip favorite state. Returns the new state.
    pub fn toggle_favorite(&self, name: &str) -> Result<bool> {
        self.update(|doc| {
            if doc.analytics.remove_favorite(name) {
                false
            } else {
                doc.analytics.add_favorite(name)
            }
        })
    }

    pub fn get_settings(&self) -> Result<Settings> {
        Ok(self.store.load()?.settings)
    }

    /// Change one setting, leaving the others untouched.
    pub fn update_setting(&self, key: SettingKey, value: bool) -> Result<Settings> {
        self.update(|doc| {
            doc.settings.set(key, value);
            doc.settings
        })
    }

    pub fn reset_settings(&self) -> Result<Settings> {
        self.update(|doc| {
            doc.settings = Settings::default();
            doc.settings
        })
    }

    pub fn validate(&self, draft: &SessionDraft) -> ValidationReport {
        validation::validate(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Editor, GitPolicy};
    use crate::store::MemoryStore;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Shares a memory store between the repository and the test.
    struct Shared(Rc<MemoryStore>);

    impl DocumentStore for Shared {
        fn load(&self) -> Result<StoreDocument> {
            self.0.load()
        }
        fn save(&self, document: &StoreDocument) -> Result<()> {
            self.0.save(document)
        }
        fn location(&self) -> Option<&Path> {
            None
        }
    }

    fn repo() -> (SessionRepository, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        (
            SessionRepository::new(Box::new(Shared(store.clone()))),
            store,
        )
    }

    fn draft(path: &str) -> SessionDraft {
        SessionDraft {
            path: Some(PathBuf::from(path)),
            editor: Some(Editor::Code),
            commands: Some(vec!["npm install".into()]),
            ..Default::default()
        }
    }

    #[test]
    fn save_sets_name_and_defaults() {
        let (repo, _) = repo();
        let session = repo.save("api", draft("/tmp/api")).unwrap();

        assert_eq!(session.name, "api");
        assert_eq!(session.template, "custom");
        assert!(session.env.is_empty());
        assert_eq!(session.created_at, session.updated_at);
        assert!(repo.exists("api").unwrap());
    }

    #[test]
    fn save_name_key_wins_over_draft_name() {
        let (repo, _) = repo();
        let mut d = draft("/tmp/api");
        d.name = Some("other".into());

        let session = repo.save("api", d).unwrap();
        assert_eq!(session.name, "api");
        assert!(!repo.exists("other").unwrap());
    }

    #[test]
    fn upsert_overwrites_fields_but_keeps_created_at() {
        let (repo, _) = repo();
        let first = repo.save("api", draft("/tmp/api")).unwrap();

        let mut second = draft("/tmp/api2");
        second.editor = None;
        second.git = Some(GitPolicy {
            branch: "main".into(),
            auto_pull: true,
        });
        let updated = repo.save("api", second).unwrap();

        assert_eq!(updated.created_at, first.created_at);
        assert!(updated.updated_at >= first.updated_at);
        assert_eq!(updated.path, PathBuf::from("/tmp/api2"));
        assert_eq!(updated.editor, None);
        assert_eq!(updated.branch(), Some("main"));
    }

    #[test]
    fn save_uses_draft_created_at_for_new_sessions() {
        let (repo, _) = repo();
        let created = "2023-01-02T03:04:05Z".parse().unwrap();
        let mut d = draft("/tmp/api");
        d.created_at = Some(created);

        let session = repo.save("api", d).unwrap();
        assert_eq!(session.created_at, created);
    }

    #[test]
    fn get_unknown_returns_none() {
        let (repo, _) = repo();
        assert!(repo.get("ghost").unwrap().is_none());
        assert!(repo.get_all().unwrap().is_empty());
    }

    #[test]
    fn delete_cascades_to_favorites_only() {
        let (repo, _) = repo();
        repo.save("api", draft("/tmp/api")).unwrap();
        repo.add_favorite("api").unwrap();
        repo.record_start("api").unwrap();

        assert!(repo.delete("api").unwrap());

        assert!(!repo.exists("api").unwrap());
        assert!(!repo.is_favorite("api").unwrap());
        let analytics = repo.get_analytics().unwrap();
        assert_eq!(analytics.session_starts.get("api"), Some(&1));
    }

    #[test]
    fn delete_missing_does_not_write() {
        let (repo, store) = repo();
        assert!(!repo.delete("ghost").unwrap());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn last_used_defaults_to_empty() {
        let (repo, _) = repo();
        assert_eq!(repo.get_last_used().unwrap(), "");
        repo.set_last_used("web").unwrap();
        assert_eq!(repo.get_last_used().unwrap(), "web");
    }

    #[test]
    fn record_start_is_one_write() {
        let (repo, store) = repo();
        repo.record_start("api").unwrap();
        repo.record_start("api").unwrap();

        assert_eq!(store.write_count(), 2);
        let stats = repo.session_stats("api").unwrap();
        assert_eq!(stats.starts, 2);
        assert!(stats.last_started.is_some());
        assert_eq!(repo.get_analytics().unwrap().total_starts, 2);
    }

    #[test]
    fn favorites_keep_insertion_order() {
        let (repo, _) = repo();
        repo.add_favorite("b").unwrap();
        repo.add_favorite("a").unwrap();
        assert!(!repo.add_favorite("b").unwrap());

        assert_eq!(repo.get_favorites().unwrap(), vec!["b", "a"]);
        assert!(repo.remove_favorite("b").unwrap());
        assert!(!repo.remove_favorite("b").unwrap());
    }

    #[test]
    fn toggle_favorite_flips_state() {
        let (repo, _) = repo();
        assert!(repo.toggle_favorite("api").unwrap());
        assert!(repo.is_favorite("api").unwrap());
        assert!(!repo.toggle_favorite("api").unwrap());
        assert!(!repo.is_favorite("api").unwrap());
    }

    #[test]
    fn update_setting_is_shallow() {
        let (repo, _) = repo();
        let settings = repo.update_setting(SettingKey::AutoGitPull, true).unwrap();

        assert!(settings.auto_git_pull);
        assert!(settings.confirm_before_delete);
        assert_eq!(repo.get_settings().unwrap(), settings);

        assert_eq!(repo.reset_settings().unwrap(), Settings::default());
    }

    #[test]
    fn store_failures_propagate() {
        let (repo, store) = repo();
        store.set_fail_writes(true);
        assert!(repo.save("api", draft("/tmp/api")).is_err());
        assert!(repo.record_start("api").is_err());
    }
}
