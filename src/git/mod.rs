//! Git plumbing used by session start, clone and doctor.
//!
//! [`GitClient`] is the seam the rest of the crate talks to. [`SystemGit`]
//! shells out to the `git` binary; tests substitute a fake.

mod system;

pub use system::SystemGit;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Requested branch does not exist locally.
    #[error("Branch \"{branch}\" does not exist")]
    BranchNotFound { branch: String },

    /// Git ran but exited non-zero.
    #[error("git {args} failed: {message}")]
    CommandFailed { args: String, message: String },

    /// Git could not be spawned.
    #[error("Failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// A configured remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Summary of a working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    /// Current branch, `None` when HEAD is detached.
    pub branch: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    pub modified: usize,
    pub created: usize,
    pub deleted: usize,
    pub remotes: Vec<Remote>,
}

/// Git operations over a working tree.
pub trait GitClient {
    /// Whether `path` is inside a git working tree. Never fails.
    fn is_repo(&self, path: &Path) -> bool;

    /// Current branch, `None` when HEAD is detached.
    fn current_branch(&self, path: &Path) -> Result<Option<String>, GitError>;

    fn local_branches(&self, path: &Path) -> Result<Vec<String>, GitError>;

    fn has_uncommitted_changes(&self, path: &Path) -> Result<bool, GitError>;

    fn stash(&self, path: &Path) -> Result<(), GitError>;

    fn checkout(&self, path: &Path, branch: &str) -> Result<(), GitError>;

    fn pull(&self, path: &Path) -> Result<(), GitError>;

    fn repo_info(&self, path: &Path) -> Result<RepoInfo, GitError>;

    /// Clone `url` into `dest`.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError>;
}

/// Result of [`switch_branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchSwitch {
    AlreadyOn,
    Switched { stashed: bool },
}

/// Check out `branch`, stashing uncommitted changes first.
///
/// Fails with [`GitError::BranchNotFound`] before touching the tree when the
/// branch is not a local branch.
pub fn switch_branch(
    git: &dyn GitClient,
    path: &Path,
    branch: &str,
) -> Result<BranchSwitch, GitError> {
    if git.current_branch(path)?.as_deref() == Some(branch) {
        return Ok(BranchSwitch::AlreadyOn);
    }

    if !git.local_branches(path)?.iter().any(|b| b == branch) {
        return Err(GitError::BranchNotFound {
            branch: branch.to_string(),
        });
    }

    let stashed = git.has_uncommitted_changes(path)?;
    if stashed {
        tracing::debug!("Stashing changes in {} before checkout", path.display());
        git.stash(path)?;
    }

    git.checkout(path, branch)?;
    Ok(BranchSwitch::Switched { stashed })
}

/// Whether `url` looks like something `git clone` accepts.
pub fn looks_like_repo_url(url: &str) -> bool {
    url.contains("github.com") || url.contains("gitlab.com") || url.contains(".git")
}

/// Repository name derived from the last URL segment, without `.git`.
pub fn repo_name_from_url(url: &str) -> String {
    let last = url
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(url);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}


#[cfg(test)]
mod tests {
    use super::fake::FakeGit;
    use super::*;

    #[test]
    fn switch_is_noop_when_already_on_branch() {
        let git = FakeGit::repo_on("main", &["main"]);
        let result = switch_branch(&git, Path::new("."), "main").unwrap();
        assert_eq!(result, BranchSwitch::AlreadyOn);
        assert!(git.calls().is_empty());
    }

    #[test]
    fn switch_rejects_unknown_branch_without_side_effects() {
        let git = FakeGit::repo_on("main", &["main"]);
        let err = switch_branch(&git, Path::new("."), "feature").unwrap_err();
        assert!(matches!(err, GitError::BranchNotFound { .. }));
        assert!(git.calls().is_empty());
    }

    #[test]
    fn switch_stashes_dirty_tree_first() {
        let mut git = FakeGit::repo_on("main", &["main", "develop"]);
        git.dirty = true;

        let result = switch_branch(&git, Path::new("."), "develop").unwrap();

        assert_eq!(result, BranchSwitch::Switched { stashed: true });
        assert_eq!(git.calls(), vec!["stash", "checkout develop"]);
    }

    #[test]
    fn switch_clean_tree_does_not_stash() {
        let git = FakeGit::repo_on("main", &["main", "develop"]);
        let result = switch_branch(&git, Path::new("."), "develop").unwrap();
        assert_eq!(result, BranchSwitch::Switched { stashed: false });
        assert_eq!(git.calls(), vec!["checkout develop"]);
    }

    #[test]
    fn repo_url_heuristic() {
        assert!(looks_like_repo_url("https://github.com/acme/api"));
        assert!(looks_like_repo_url("git@example.com:acme/api.git"));
        assert!(!looks_like_repo_url("https://example.com/acme/api"));
    }

    #[test]
    fn repo_name_strips_git_suffix() {
        assert_eq!(repo_name_from_url("https://github.com/acme/api.git"), "api");
        assert_eq!(repo_name_from_url("https://gitlab.com/acme/web/"), "web");
        assert_eq!(repo_name_from_url("git@github.com:acme/tool.git"), "tool");
    }
}
