//! Session start sequencing.
//!
//! Starting a session runs, in order:
//!
//! 1. identity resolution (explicit name, else the last used session)
//! 2. bookkeeping (`lastUsed` and start counters) before any side effect
//! 3. git sync when the path is a repository: branch switch, then pull
//! 4. editor launch
//! 5. commands, long-running ones detached and the rest awaited
//! 6. a summary
//!
//! Only resolution and store failures abort. Git, editor and command
//! failures become warnings and the sequence carries on.

mod classifier;

pub use classifier::{CommandClassifier, CommandKind};

use std::path::PathBuf;

use crate::error::{DevflowError, Result};
use crate::git::{self, BranchSwitch, GitClient, GitError, RepoInfo};
use crate::launch::Launcher;
use crate::session::{Editor, Session, SessionRepository};
use crate::ui::UserInterface;

/// What happened to the session's branch policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    AlreadyOn,
    Switched { stashed: bool },
    Missing,
    Failed(String),
}

/// What happened when pulling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    Pulled,
    Failed(String),
}

/// Git sync results. Present only when the path is a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutcome {
    pub starting_branch: Option<String>,
    pub branch: Option<BranchOutcome>,
    pub pull: Option<PullOutcome>,
    /// Repository state after the sync, if it could be read.
    pub info: Option<RepoInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    Skipped,
    Opened(Editor),
    Failed { editor: Editor, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    Detached,
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub command: String,
    pub kind: CommandKind,
    pub status: CommandStatus,
}

/// Everything a session start did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    pub name: String,
    pub path: PathBuf,
    pub git: Option<GitOutcome>,
    pub editor: EditorOutcome,
    pub commands: Vec<CommandOutcome>,
}

impl StartReport {
    /// Commands that failed to spawn or exited non-zero.
    pub fn failed_commands(&self) -> impl Iterator<Item = &CommandOutcome> {
        self.commands
            .iter()
            .filter(|c| matches!(c.status, CommandStatus::Failed { .. }))
    }
}

/// Runs the start sequence for one session.
pub struct SessionStarter<'a> {
    repository: &'a SessionRepository,
    git: &'a dyn GitClient,
    launcher: &'a dyn Launcher,
    classifier: CommandClassifier,
}

impl<'a> SessionStarter<'a> {
    pub fn new(
        repository: &'a SessionRepository,
        git: &'a dyn GitClient,
        launcher: &'a dyn Launcher,
    ) -> Self {
        Self {
            repository,
            git,
            launcher,
            classifier: CommandClassifier::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: CommandClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Resolve the session to start.
    ///
    /// No name falls back to the last used session.
    pub fn resolve(&self, name: Option<&str>) -> Result<Session> {
        let name = match name {
            Some(n) => n.to_string(),
            None => {
                let last = self.repository.get_last_used()?;
                if last.is_empty() {
                    return Err(DevflowError::NoSessionSelected);
                }
                last
            }
        };

        self.repository
            .get(&name)?
            .ok_or(DevflowError::SessionNotFound { name })
    }

    /// Resolve and start a session.
    pub fn start(&self, name: Option<&str>, ui: &mut dyn UserInterface) -> Result<StartReport> {
        let session = self.resolve(name)?;
        if name.is_none() {
            ui.message(&format!("Using last session: {}", session.name));
        }
        self.run(&session, ui)
    }

    /// Start an already resolved session.
    pub fn run(&self, session: &Session, ui: &mut dyn UserInterface) -> Result<StartReport> {
        self.repository.set_last_used(&session.name)?;
        self.repository.record_start(&session.name)?;
        tracing::info!("Starting session {}", session.name);

        let settings = self.repository.get_settings()?;

        if !session.path.exists() {
            ui.warning(&format!(
                "Project path does not exist: {}",
                session.path.display()
            ));
        }

        let git = if self.git.is_repo(&session.path) {
            Some(self.sync_git(session, settings.auto_git_pull, ui))
        } else {
            None
        };

        let editor = match session.editor {
            Some(editor) => self.open_editor(session, editor, settings.open_editor_in_new_window, ui),
            None => EditorOutcome::Skipped,
        };

        let commands = self.run_commands(session, ui);

        let mut report = StartReport {
            name: session.name.clone(),
            path: session.path.clone(),
            git,
            editor,
            commands,
        };
        self.summarize(&mut report, ui);
        Ok(report)
    }

    fn sync_git(&self, session: &Session, auto_git_pull: bool, ui: &mut dyn UserInterface) -> GitOutcome {
        let path = &session.path;
        ui.message("Git repository detected");

        let mut outcome = GitOutcome::default();
        match self.git.current_branch(path) {
            Ok(branch) => {
                ui.message(&format!(
                    "  Current branch: {}",
                    branch.as_deref().unwrap_or("(detached)")
                ));
                outcome.starting_branch = branch;
            }
            Err(e) => ui.warning(&format!("Could not read current branch: {}", e)),
        }

        if let Some(target) = session.branch() {
            outcome.branch = Some(self.switch_branch(session, target, ui));
        }

        let session_pull = session.git.as_ref().is_some_and(|g| g.auto_pull);
        if session_pull || auto_git_pull {
            let mut spinner = ui.start_spinner("Pulling latest changes...");
            outcome.pull = Some(match self.git.pull(path) {
                Ok(()) => {
                    spinner.finish_success("Pulled latest changes");
                    PullOutcome::Pulled
                }
                Err(e) => {
                    spinner.finish_error("Pull failed");
                    ui.warning(&format!("Failed to pull: {}", e));
                    PullOutcome::Failed(e.to_string())
                }
            });
        }

        outcome
    }

    fn switch_branch(&self, session: &Session, target: &str, ui: &mut dyn UserInterface) -> BranchOutcome {
        match git::switch_branch(self.git, &session.path, target) {
            Ok(BranchSwitch::AlreadyOn) => {
                ui.success(&format!("Already on branch: {}", target));
                BranchOutcome::AlreadyOn
            }
            Ok(BranchSwitch::Switched { stashed }) => {
                if stashed {
                    ui.warning("Stashed uncommitted changes before switching");
                }
                ui.success(&format!("Switched to branch \"{}\"", target));
                BranchOutcome::Switched { stashed }
            }
            Err(GitError::BranchNotFound { .. }) => {
                ui.warning(&format!("Branch \"{}\" does not exist", target));
                BranchOutcome::Missing
            }
            Err(e) => {
                ui.warning(&format!("Failed to checkout branch: {}", e));
                BranchOutcome::Failed(e.to_string())
            }
        }
    }

    fn open_editor(
        &self,
        session: &Session,
        editor: Editor,
        new_window: bool,
        ui: &mut dyn UserInterface,
    ) -> EditorOutcome {
        let mut spinner = ui.start_spinner(&format!("Opening {}...", editor));
        match self.launcher.open_editor(editor, &session.path, new_window) {
            Ok(()) => {
                spinner.finish_success(&format!("Opened {}", editor));
                EditorOutcome::Opened(editor)
            }
            Err(e) => {
                spinner.finish_error(&format!("Could not open {}", editor));
                ui.warning(&e.to_string());
                EditorOutcome::Failed {
                    editor,
                    message: e.to_string(),
                }
            }
        }
    }

    fn run_commands(&self, session: &Session, ui: &mut dyn UserInterface) -> Vec<CommandOutcome> {
        let total = session.commands.len();
        if total == 0 {
            return Vec::new();
        }

        ui.message(&format!("\nRunning {} command(s)...\n", total));

        let mut outcomes = Vec::with_capacity(total);
        for (index, command) in session.commands.iter().enumerate() {
            ui.message(&format!("[{}/{}] {}", index + 1, total, command));

            let kind = self.classifier.classify(command);
            let result = match kind {
                CommandKind::LongRunning => self
                    .launcher
                    .spawn_detached(command, &session.path, &session.env)
                    .map(|spawned| {
                        tracing::debug!("Detached `{}` (pid {})", command, spawned.pid);
                        CommandStatus::Detached
                    }),
                CommandKind::Blocking => self
                    .launcher
                    .run_blocking(command, &session.path, &session.env)
                    .map(|()| CommandStatus::Completed),
            };

            let status = result.unwrap_or_else(|e| {
                let message = match e {
                    DevflowError::CommandFailed { reason, .. } => reason,
                    other => other.to_string(),
                };
                ui.warning(&format!("Command had issues: {}: {}", command, message));
                CommandStatus::Failed { message }
            });

            outcomes.push(CommandOutcome {
                command: command.clone(),
                kind,
                status,
            });
        }
        outcomes
    }

    fn summarize(&self, report: &mut StartReport, ui: &mut dyn UserInterface) {
        if report.commands.is_empty() {
            ui.success(&format!("Session \"{}\" started (editor only)", report.name));
            return;
        }

        ui.message("");
        ui.success(&format!("Session \"{}\" started successfully!", report.name));
        ui.message(&format!("Working directory: {}", report.path.display()));

        if let Some(git) = report.git.as_mut() {
            match self.git.repo_info(&report.path) {
                Ok(info) => {
                    ui.message(&format!(
                        "  Branch: {}",
                        info.branch.as_deref().unwrap_or("(detached)")
                    ));
                    if info.modified > 0 {
                        ui.message(&format!("  Modified files: {}", info.modified));
                    }
                    git.info = Some(info);
                }
                Err(e) => tracing::debug!("Could not read repo info: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeGit;
    use crate::launch::fake::{FakeLauncher, Launch};
    use crate::session::{GitPolicy, SessionDraft, SettingKey};
    use crate::store::MemoryStore;
    use crate::ui::MockUI;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn repo_with(name: &str, draft: SessionDraft) -> SessionRepository {
        let repo = SessionRepository::new(Box::new(MemoryStore::new()));
        repo.save(name, draft).unwrap();
        repo
    }

    fn api_draft(path: &std::path::Path) -> SessionDraft {
        SessionDraft {
            path: Some(path.to_path_buf()),
            editor: Some(Editor::Code),
            commands: Some(vec!["npm install".into(), "npm run dev".into()]),
            env: Some(BTreeMap::from([("PORT".to_string(), "3000".to_string())])),
            ..Default::default()
        }
    }

    #[test]
    fn api_scenario_awaits_install_and_detaches_dev() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with("api", api_draft(temp.path()));
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut ui)
            .unwrap();

        assert_eq!(repo.session_stats("api").unwrap().starts, 1);
        assert_eq!(repo.get_last_used().unwrap(), "api");

        let env = BTreeMap::from([("PORT".to_string(), "3000".to_string())]);
        assert_eq!(
            launcher.launches(),
            vec![
                Launch::Editor {
                    editor: Editor::Code,
                    new_window: true
                },
                Launch::Blocking {
                    command: "npm install".into(),
                    env: env.clone()
                },
                Launch::Detached {
                    command: "npm run dev".into(),
                    env
                },
            ]
        );
        assert_eq!(report.commands[0].status, CommandStatus::Completed);
        assert_eq!(report.commands[1].status, CommandStatus::Detached);
        assert_eq!(report.editor, EditorOutcome::Opened(Editor::Code));
        assert!(report.git.is_none());
        assert!(ui.has_success("Session \"api\" started successfully!"));
    }

    #[test]
    fn bookkeeping_happens_even_when_path_is_missing() {
        let repo = repo_with(
            "ghost",
            SessionDraft {
                path: Some(PathBuf::from("/definitely/not/here")),
                ..Default::default()
            },
        );
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();
        let mut ui = MockUI::new();

        SessionStarter::new(&repo, &git, &launcher)
            .start(Some("ghost"), &mut ui)
            .unwrap();

        assert_eq!(repo.session_stats("ghost").unwrap().starts, 1);
        assert!(ui.has_warning("Project path does not exist"));
        assert!(ui.has_success("started (editor only)"));
    }

    #[test]
    fn spawn_failure_reports_os_error() {
        let repo = repo_with(
            "ghost",
            SessionDraft {
                path: Some(PathBuf::from("/definitely/not/here")),
                commands: Some(vec!["echo hi".into()]),
                ..Default::default()
            },
        );
        let git = FakeGit::default();
        let launcher = crate::launch::SystemLauncher::new();
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("ghost"), &mut ui)
            .unwrap();

        match &report.commands[0].status {
            CommandStatus::Failed { message } => {
                assert!(message.starts_with("could not start: "));
                assert!(message.contains("No such file"));
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(ui.has_warning("Command had issues: echo hi: could not start"));
    }

    #[test]
    fn no_name_uses_last_used() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with("api", api_draft(temp.path()));
        repo.set_last_used("api").unwrap();
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(None, &mut ui)
            .unwrap();

        assert_eq!(report.name, "api");
        assert!(ui.has_message("Using last session: api"));
    }

    #[test]
    fn no_name_and_no_last_used_is_an_error() {
        let repo = SessionRepository::new(Box::new(MemoryStore::new()));
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();

        let err = SessionStarter::new(&repo, &git, &launcher)
            .start(None, &mut MockUI::new())
            .unwrap_err();
        assert!(matches!(err, DevflowError::NoSessionSelected));
    }

    #[test]
    fn unknown_session_is_not_found_and_records_nothing() {
        let repo = SessionRepository::new(Box::new(MemoryStore::new()));
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();

        let err = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("nope"), &mut MockUI::new())
            .unwrap_err();

        assert!(matches!(err, DevflowError::SessionNotFound { .. }));
        assert_eq!(repo.get_analytics().unwrap().total_starts, 0);
    }

    #[test]
    fn failed_blocking_command_warns_and_continues() {
        let temp = TempDir::new().unwrap();
        let mut draft = api_draft(temp.path());
        draft.commands = Some(vec!["npm install".into(), "npm test".into(), "npm run dev".into()]);
        let repo = repo_with("api", draft);
        let git = FakeGit::default();
        let launcher = FakeLauncher::failing_on(&["npm install"]);
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut ui)
            .unwrap();

        assert_eq!(report.commands.len(), 3);
        assert_eq!(report.failed_commands().count(), 1);
        assert!(ui.has_warning("Command had issues: npm install: exited with code 1"));
        assert_eq!(
            report.commands[0].status,
            CommandStatus::Failed {
                message: "exited with code 1".into()
            }
        );
        assert_eq!(report.commands[2].status, CommandStatus::Detached);
    }

    #[test]
    fn editor_failure_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with("api", api_draft(temp.path()));
        let git = FakeGit::default();
        let launcher = FakeLauncher {
            fail_editor: true,
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut ui)
            .unwrap();

        assert!(matches!(report.editor, EditorOutcome::Failed { .. }));
        assert_eq!(report.commands.len(), 2);
    }

    #[test]
    fn new_window_setting_is_passed_to_editor() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with("api", api_draft(temp.path()));
        repo.update_setting(SettingKey::OpenEditorInNewWindow, false)
            .unwrap();
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();

        SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut MockUI::new())
            .unwrap();

        assert_eq!(
            launcher.launches()[0],
            Launch::Editor {
                editor: Editor::Code,
                new_window: false
            }
        );
    }

    #[test]
    fn switches_branch_and_reports_final_state() {
        let temp = TempDir::new().unwrap();
        let mut draft = api_draft(temp.path());
        draft.git = Some(GitPolicy {
            branch: "develop".into(),
            auto_pull: false,
        });
        let repo = repo_with("api", draft);
        let mut git = FakeGit::repo_on("main", &["main", "develop"]);
        git.dirty = true;
        git.info.modified = 2;
        let launcher = FakeLauncher::default();
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut ui)
            .unwrap();

        let outcome = report.git.unwrap();
        assert_eq!(outcome.starting_branch.as_deref(), Some("main"));
        assert_eq!(outcome.branch, Some(BranchOutcome::Switched { stashed: true }));
        assert_eq!(outcome.pull, None);
        assert_eq!(outcome.info.unwrap().branch.as_deref(), Some("develop"));
        assert_eq!(git.calls(), vec!["stash", "checkout develop"]);
        assert!(ui.has_message("Modified files: 2"));
    }

    #[test]
    fn missing_branch_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let mut draft = api_draft(temp.path());
        draft.git = Some(GitPolicy {
            branch: "feature".into(),
            auto_pull: false,
        });
        let repo = repo_with("api", draft);
        let git = FakeGit::repo_on("main", &["main"]);
        let launcher = FakeLauncher::default();
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut ui)
            .unwrap();

        assert_eq!(report.git.unwrap().branch, Some(BranchOutcome::Missing));
        assert!(ui.has_warning("Branch \"feature\" does not exist"));
        assert_eq!(launcher.launches().len(), 3);
    }

    #[test]
    fn global_auto_pull_setting_triggers_pull() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with("api", api_draft(temp.path()));
        repo.update_setting(SettingKey::AutoGitPull, true).unwrap();
        let git = FakeGit::repo_on("main", &["main"]);
        let launcher = FakeLauncher::default();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut MockUI::new())
            .unwrap();

        assert_eq!(report.git.unwrap().pull, Some(PullOutcome::Pulled));
        assert_eq!(git.calls(), vec!["pull"]);
    }

    #[test]
    fn pull_failure_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let mut draft = api_draft(temp.path());
        draft.git = Some(GitPolicy {
            branch: "main".into(),
            auto_pull: true,
        });
        let repo = repo_with("api", draft);
        let mut git = FakeGit::repo_on("main", &["main"]);
        git.fail_pull = true;
        let launcher = FakeLauncher::default();
        let mut ui = MockUI::new();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .start(Some("api"), &mut ui)
            .unwrap();

        let outcome = report.git.unwrap();
        assert_eq!(outcome.branch, Some(BranchOutcome::AlreadyOn));
        assert!(matches!(outcome.pull, Some(PullOutcome::Failed(_))));
        assert!(ui.has_warning("Failed to pull"));
    }

    #[test]
    fn custom_classifier_changes_detachment() {
        let temp = TempDir::new().unwrap();
        let repo = repo_with("api", api_draft(temp.path()));
        let git = FakeGit::default();
        let launcher = FakeLauncher::default();

        let report = SessionStarter::new(&repo, &git, &launcher)
            .with_classifier(CommandClassifier::with_markers(["install"]))
            .start(Some("api"), &mut MockUI::new())
            .unwrap();

        assert_eq!(report.commands[0].kind, CommandKind::LongRunning);
        assert_eq!(report.commands[1].kind, CommandKind::Blocking);
    }
}
