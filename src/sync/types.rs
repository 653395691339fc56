use super::steps::SyncStep;
use crate::error::Diagnostic;
use chrono::{DateTime, Local};
use std::path::PathBuf;

pub const DEFAULT_BRANCH: &str = "main";

/// One tracked folder and where it is pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub local_path: PathBuf,
    pub remote_url: String,
    pub branch: String,
    /// Ordered and free of duplicates. Empty skips large-file handling.
    pub large_file_patterns: Vec<String>,
}

impl RepositoryDescriptor {
    pub fn new(
        name: impl Into<String>,
        local_path: impl Into<PathBuf>,
        remote_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            local_path: local_path.into(),
            remote_url: remote_url.into(),
            branch: DEFAULT_BRANCH.to_string(),
            large_file_patterns: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_large_file_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.large_file_patterns = dedup_patterns(patterns);
        self
    }

    /// Checks the fields Bootstrap and Sync cannot work without.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("repository name cannot be empty".to_string());
        }
        if self.local_path.as_os_str().is_empty() {
            return Err(format!("repository '{}' has no local path", self.name));
        }
        if self.remote_url.trim().is_empty() {
            return Err(format!("repository '{}' has no remote URL", self.name));
        }
        if self.branch.trim().is_empty() {
            return Err(format!("repository '{}' has no branch", self.name));
        }
        Ok(())
    }
}

pub(crate) fn dedup_patterns<I, S>(patterns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for pattern in patterns {
        let pattern = pattern.into();
        if !out.contains(&pattern) {
            out.push(pattern);
        }
    }
    out
}

/// Runtime view of the persisted configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfiguration {
    pub interval_seconds: u64,
    pub commit_message: String,
    pub allow_dirty_worktrees: bool,
    pub repositories: Vec<RepositoryDescriptor>,
}

impl SyncConfiguration {
    pub fn empty() -> Self {
        Self {
            interval_seconds: crate::config::DEFAULT_INTERVAL_MINUTES * 60,
            commit_message: crate::config::DEFAULT_COMMIT_MESSAGE.to_string(),
            allow_dirty_worktrees: false,
            repositories: Vec::new(),
        }
    }

    pub fn repository(&self, name: &str) -> Option<&RepositoryDescriptor> {
        self.repositories.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSuccess {
    pub repository: String,
    /// Whether this run created a commit.
    pub committed: bool,
    /// Output of the final push.
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub repository: String,
    pub step: SyncStep,
    pub diagnostic: Diagnostic,
}

impl SyncFailure {
    pub fn is_missing_path(&self) -> bool {
        self.step == SyncStep::VerifyPath
    }
}

impl std::fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} failed: {}",
            self.repository, self.step, self.diagnostic
        )
    }
}

impl std::error::Error for SyncFailure {}

/// Result of one repository's bootstrap or sync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Success(SyncSuccess),
    Failure(SyncFailure),
}

impl SyncOutcome {
    pub fn repository(&self) -> &str {
        match self {
            SyncOutcome::Success(s) => &s.repository,
            SyncOutcome::Failure(f) => &f.repository,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success(_))
    }

    pub fn failure(&self) -> Option<&SyncFailure> {
        match self {
            SyncOutcome::Failure(f) => Some(f),
            SyncOutcome::Success(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Success(_) => "pushed",
            SyncOutcome::Failure(f) if f.is_missing_path() => "missing path",
            SyncOutcome::Failure(_) => "failed",
        }
    }
}

impl From<std::result::Result<SyncSuccess, SyncFailure>> for SyncOutcome {
    fn from(result: std::result::Result<SyncSuccess, SyncFailure>) -> Self {
        match result {
            Ok(success) => SyncOutcome::Success(success),
            Err(failure) => SyncOutcome::Failure(failure),
        }
    }
}

/// Everything one pass over the configured repositories produced.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcomes: Vec<SyncOutcome>,
    pub finished_at: DateTime<Local>,
}

impl CycleReport {
    pub fn new(outcomes: Vec<SyncOutcome>) -> Self {
        Self {
            outcomes,
            finished_at: Local::now(),
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &SyncFailure> {
        self.outcomes.iter().filter_map(SyncOutcome::failure)
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn outcome(&self, repository: &str) -> Option<&SyncOutcome> {
        self.outcomes.iter().find(|o| o.repository() == repository)
    }
}
