//! `git` binary implementation of [`GitClient`].

use std::path::Path;
use std::process::Command;

use super::{GitClient, GitError, Remote, RepoInfo};

/// Runs the system `git` in the session's directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl SystemGit {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, path: &Path, args: &[&str]) -> Result<String, GitError> {
        tracing::debug!("git {} (in {})", args.join(" "), path.display());
        let output = Command::new("git")
            .args(args)
            .current_dir(path)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                args: args.join(" "),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl GitClient for SystemGit {
    fn is_repo(&self, path: &Path) -> bool {
        self.run(path, &["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    fn current_branch(&self, path: &Path) -> Result<Option<String>, GitError> {
        let out = self.run(path, &["branch", "--show-current"])?;
        let branch = out.trim();
        Ok((!branch.is_empty()).then(|| branch.to_string()))
    }

    fn local_branches(&self, path: &Path) -> Result<Vec<String>, GitError> {
        let out = self.run(path, &["branch", "--format=%(refname:short)"])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn has_uncommitted_changes(&self, path: &Path) -> Result<bool, GitError> {
        let out = self.run(path, &["status", "--porcelain"])?;
        Ok(!out.trim().is_empty())
    }

    fn stash(&self, path: &Path) -> Result<(), GitError> {
        self.run(path, &["stash"]).map(|_| ())
    }

    fn checkout(&self, path: &Path, branch: &str) -> Result<(), GitError> {
        self.run(path, &["checkout", branch]).map(|_| ())
    }

    fn pull(&self, path: &Path) -> Result<(), GitError> {
        self.run(path, &["pull"]).map(|_| ())
    }

    fn repo_info(&self, path: &Path) -> Result<RepoInfo, GitError> {
        let status = self.run(path, &["status", "--porcelain=v2", "--branch"])?;
        let remotes = self.run(path, &["remote", "-v"])?;

        let mut info = parse_status_v2(&status);
        info.remotes = parse_remotes(&remotes);
        Ok(info)
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), GitError> {
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(parent)?;

        let dest = dest.to_string_lossy();
        self.run(parent, &["clone", url, dest.as_ref()]).map(|_| ())
    }
}

/// Parse `git status --porcelain=v2 --branch` output.
fn parse_status_v2(output: &str) -> RepoInfo {
    let mut info = RepoInfo::default();

    for line in output.lines() {
        if let Some(head) = line.strip_prefix("# branch.head ") {
            if head != "(detached)" {
                info.branch = Some(head.to_string());
            }
        } else if let Some(ab) = line.strip_prefix("# branch.ab ") {
            for part in ab.split_whitespace() {
                if let Some(n) = part.strip_prefix('+') {
                    info.ahead = n.parse().unwrap_or(0);
                } else if let Some(n) = part.strip_prefix('-') {
                    info.behind = n.parse().unwrap_or(0);
                }
            }
        } else if line.starts_with("1 ") || line.starts_with("2 ") {
            let xy = line.split_whitespace().nth(1).unwrap_or("..");
            if xy.contains('M') {
                info.modified += 1;
            }
            if xy.starts_with('A') {
                info.created += 1;
            }
            if xy.contains('D') {
                info.deleted += 1;
            }
        }
    }

    info
}

/// Parse `git remote -v`, keeping fetch URLs.
fn parse_remotes(output: &str) -> Vec<Remote> {
    output
        .lines()
        .filter(|l| l.ends_with("(fetch)"))
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            Some(Remote {
                name: parts.next()?.to_string(),
                url: parts.next()?.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_status_reads_branch_and_counts() {
        let out = "\
# branch.oid 1234
# branch.head main
# branch.upstream origin/main
# branch.ab +2 -1
1 .M N... 100644 100644 100644 abc abc src/lib.rs
1 M. N... 100644 100644 100644 abc abc src/main.rs
1 A. N... 000000 100644 100644 000 abc new.rs
1 .D N... 100644 100644 000000 abc abc gone.rs
? untracked.txt
";
        let info = parse_status_v2(out);
        assert_eq!(info.branch.as_deref(), Some("main"));
        assert_eq!(info.ahead, 2);
        assert_eq!(info.behind, 1);
        assert_eq!(info.modified, 2);
        assert_eq!(info.created, 1);
        assert_eq!(info.deleted, 1);
    }

    #[test]
    fn parse_status_detached_head() {
        let info = parse_status_v2("# branch.oid abc\n# branch.head (detached)\n");
        assert_eq!(info.branch, None);
        assert_eq!(info.ahead, 0);
    }

    #[test]
    fn parse_remotes_keeps_fetch_lines() {
        let out = "origin\thttps://github.com/acme/api.git (fetch)\n\
                   origin\thttps://github.com/acme/api.git (push)\n\
                   upstream\tgit@github.com:up/api.git (fetch)\n";
        let remotes = parse_remotes(out);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[1].url, "git@github.com:up/api.git");
    }

    #[test]
    fn plain_directory_is_not_a_repo() {
        let temp = TempDir::new().unwrap();
        assert!(!SystemGit::new().is_repo(temp.path()));
    }

    #[test]
    fn missing_directory_is_not_a_repo() {
        assert!(!SystemGit::new().is_repo(Path::new("/definitely/not/here")));
    }
}
