use super::paths::expand_tilde;
use crate::sync::{dedup_patterns, RepositoryDescriptor, SyncConfiguration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    pub name: String,
    pub path: String,
    pub remote: String,
    #[serde(default = "super::default_branch")]
    pub branch: String,
    #[serde(default)]
    pub lfs_patterns: Vec<String>,
    /// Carried through load and save untouched; sync does not read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_file: Option<String>,
}

impl RepoConfig {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        remote: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            remote: remote.into(),
            branch: super::default_branch(),
            lfs_patterns: Vec::new(),
            ignore_file: None,
        }
    }
}

impl From<&RepoConfig> for RepositoryDescriptor {
    fn from(repo: &RepoConfig) -> Self {
        RepositoryDescriptor::new(&repo.name, expand_tilde(&repo.path), &repo.remote)
            .with_branch(repo.branch.trim())
            .with_large_file_patterns(repo.lfs_patterns.iter().cloned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "super::default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
    #[serde(default = "super::default_commit_message")]
    pub commit_message: String,
    #[serde(default)]
    pub allow_dirty_worktrees: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interval_minutes: super::default_interval_minutes(),
            repos: Vec::new(),
            commit_message: super::default_commit_message(),
            allow_dirty_worktrees: false,
        }
    }
}

impl AppConfig {
    pub fn repo(&self, name: &str) -> Option<&RepoConfig> {
        self.repos.iter().find(|r| r.name == name)
    }

    /// Append a repository. Names are unique, so an existing entry with the
    /// same name is replaced in place.
    pub fn upsert_repo(&mut self, repo: RepoConfig) {
        match self.repos.iter_mut().find(|r| r.name == repo.name) {
            Some(existing) => *existing = repo,
            None => self.repos.push(repo),
        }
    }

    pub fn remove_repo(&mut self, name: &str) -> bool {
        let before = self.repos.len();
        self.repos.retain(|r| r.name != name);
        self.repos.len() != before
    }
}

impl From<&AppConfig> for SyncConfiguration {
    fn from(config: &AppConfig) -> Self {
        SyncConfiguration {
            interval_seconds: config.interval_minutes.saturating_mul(60),
            commit_message: config.commit_message.clone(),
            allow_dirty_worktrees: config.allow_dirty_worktrees,
            repositories: config.repos.iter().map(RepositoryDescriptor::from).collect(),
        }
    }
}

/// Split a comma-separated pattern list. Entries are trimmed, empty ones
/// dropped, and duplicates removed keeping the first occurrence.
pub fn parse_pattern_list(input: &str) -> Vec<String> {
    dedup_patterns(
        input
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    )
}
