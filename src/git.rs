//! The fixed set of git invocations used by bootstrap and sync.
//!
//! Nothing here retries or interprets results. Each call runs with the
//! repository as its working directory and returns the runner's raw result.

use crate::error::Diagnostic;
use crate::process::{render_command, CommandRunner};
use crate::session::LogStore;
use std::path::Path;
use std::sync::Arc;

pub const GIT_PROGRAM: &str = "git";
pub const ATTRIBUTES_FILE: &str = ".gitattributes";

type GitResult = std::result::Result<String, Diagnostic>;

pub struct GitCli<R> {
    runner: R,
    log: Arc<LogStore>,
}

impl<R: CommandRunner> GitCli<R> {
    pub fn new(runner: R, log: Arc<LogStore>) -> Self {
        Self { runner, log }
    }

    pub fn log(&self) -> &LogStore {
        &self.log
    }

    async fn git(&self, repo: &Path, args: &[&str]) -> GitResult {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.log.append(format!(
            "{} ({})",
            render_command(GIT_PROGRAM, &args),
            repo.display()
        ));
        self.runner.run(GIT_PROGRAM, &args, Some(repo)).await
    }

    pub async fn version(&self) -> GitResult {
        let args = vec!["--version".to_string()];
        self.runner.run(GIT_PROGRAM, &args, None).await
    }

    pub async fn lfs_version(&self) -> GitResult {
        let args = vec!["lfs".to_string(), "version".to_string()];
        self.runner.run(GIT_PROGRAM, &args, None).await
    }

    pub async fn init(&self, repo: &Path) -> GitResult {
        self.git(repo, &["init"]).await
    }

    pub async fn remote_set_url(&self, repo: &Path, url: &str) -> GitResult {
        self.git(repo, &["remote", "set-url", "origin", url]).await
    }

    pub async fn remote_add(&self, repo: &Path, url: &str) -> GitResult {
        self.git(repo, &["remote", "add", "origin", url]).await
    }

    pub async fn git_dir(&self, repo: &Path) -> GitResult {
        self.git(repo, &["rev-parse", "--git-dir"]).await
    }

    pub async fn verify_head(&self, repo: &Path) -> GitResult {
        self.git(repo, &["rev-parse", "--verify", "HEAD"]).await
    }

    /// Short name of the checked-out branch, `HEAD` when detached.
    pub async fn current_branch(&self, repo: &Path) -> GitResult {
        self.git(repo, &["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .map(|out| out.trim().to_string())
    }

    pub async fn checkout_branch(&self, repo: &Path, branch: &str) -> GitResult {
        self.git(repo, &["checkout", "-B", branch]).await
    }

    pub async fn rename_branch(&self, repo: &Path, branch: &str) -> GitResult {
        self.git(repo, &["branch", "-M", branch]).await
    }

    pub async fn add_all(&self, repo: &Path) -> GitResult {
        self.git(repo, &["add", "-A"]).await
    }

    pub async fn add_attributes(&self, repo: &Path) -> GitResult {
        self.git(repo, &["add", ATTRIBUTES_FILE]).await
    }

    pub async fn commit(&self, repo: &Path, message: &str) -> GitResult {
        self.git(repo, &["commit", "-m", message]).await
    }

    /// Commit even when nothing is staged. Used for the first commit of a
    /// bootstrapped folder that may be empty.
    pub async fn commit_allow_empty(&self, repo: &Path, message: &str) -> GitResult {
        self.git(repo, &["commit", "--allow-empty", "-m", message]).await
    }

    pub async fn status_porcelain(&self, repo: &Path) -> GitResult {
        self.git(repo, &["status", "--porcelain"]).await
    }

    pub async fn pull_rebase(&self, repo: &Path, branch: &str) -> GitResult {
        self.git(repo, &["pull", "--rebase", "origin", branch]).await
    }

    pub async fn push_upstream(&self, repo: &Path, branch: &str) -> GitResult {
        self.git(repo, &["push", "-u", "origin", branch]).await
    }

    pub async fn push(&self, repo: &Path, branch: &str) -> GitResult {
        self.git(repo, &["push", "origin", branch]).await
    }

    pub async fn lfs_install(&self, repo: &Path) -> GitResult {
        self.git(repo, &["lfs", "install", "--skip-repo"]).await
    }

    pub async fn lfs_track(&self, repo: &Path, pattern: &str) -> GitResult {
        self.git(repo, &["lfs", "track", pattern]).await
    }
}

/// Number of entries in `git status --porcelain` output.
pub fn count_pending_changes(porcelain: &str) -> usize {
    porcelain.lines().filter(|line| !line.trim().is_empty()).count()
}
