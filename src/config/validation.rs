use super::schema::{AppConfig, RepoConfig};
use super::{MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES};
use crate::error::{GittyCatError, Result};
use std::collections::HashSet;

pub fn validate_branch_name(branch_name: &str) -> Result<()> {
    if branch_name.is_empty() {
        return Err(GittyCatError::Config(
            "Branch name cannot be empty".to_string(),
        ));
    }

    if branch_name.starts_with('-') {
        return Err(GittyCatError::Config(
            "Branch name cannot start with '-'".to_string(),
        ));
    }

    if branch_name.bytes().any(|b| b < 32 || b == 127) {
        return Err(GittyCatError::Config(
            "Branch name contains control characters".to_string(),
        ));
    }

    let disallowed_patterns = ["..", "~", "^", ":", "?", "*", "[", "\\", " ", "@{"];
    for pattern in &disallowed_patterns {
        if branch_name.contains(pattern) {
            return Err(GittyCatError::Config(format!(
                "Branch name cannot contain '{}'",
                pattern
            )));
        }
    }

    if branch_name.starts_with('/') || branch_name.ends_with('/') {
        return Err(GittyCatError::Config(
            "Branch name cannot start or end with '/'".to_string(),
        ));
    }

    if branch_name.contains("//") {
        return Err(GittyCatError::Config(
            "Branch name cannot contain consecutive slashes".to_string(),
        ));
    }

    if branch_name.starts_with('.') || branch_name.ends_with('.') {
        return Err(GittyCatError::Config(
            "Branch name cannot start or end with '.'".to_string(),
        ));
    }

    if branch_name.ends_with(".lock") {
        return Err(GittyCatError::Config(
            "Branch name cannot end with '.lock'".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_pattern(pattern: &str) -> Result<()> {
    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| GittyCatError::Config(format!("Invalid pattern '{}': {}", pattern, e)))
}

/// Full check for a repository entry being added, including that every
/// large-file pattern parses as a glob.
pub fn validate_repo(repo: &RepoConfig) -> Result<()> {
    validate_repo_fields(repo)?;
    for pattern in &repo.lfs_patterns {
        validate_pattern(pattern).map_err(|e| in_repo(&repo.name, e))?;
    }
    Ok(())
}

fn validate_repo_fields(repo: &RepoConfig) -> Result<()> {
    if repo.name.trim().is_empty() {
        return Err(GittyCatError::Config(
            "Repository name cannot be empty".to_string(),
        ));
    }
    if repo.path.trim().is_empty() {
        return Err(GittyCatError::Config(format!(
            "Repository '{}' has no path",
            repo.name
        )));
    }
    if repo.remote.trim().is_empty() {
        return Err(GittyCatError::Config(format!(
            "Repository '{}' has no remote",
            repo.name
        )));
    }
    validate_branch_name(repo.branch.trim()).map_err(|e| in_repo(&repo.name, e))
}

fn in_repo(name: &str, err: GittyCatError) -> GittyCatError {
    match err {
        GittyCatError::Config(message) => {
            GittyCatError::Config(format!("Repository '{}': {}", name, message))
        }
        other => other,
    }
}

/// Check a whole configuration as stored.
///
/// Large-file patterns are only warned about here. `git lfs track` has its
/// own matching rules and a pattern it rejects fails just that step.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if !(MIN_INTERVAL_MINUTES..=MAX_INTERVAL_MINUTES).contains(&config.interval_minutes) {
        return Err(GittyCatError::Config(format!(
            "intervalMinutes must be between {} and {}, got {}",
            MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES, config.interval_minutes
        )));
    }

    let mut names = HashSet::new();
    for repo in &config.repos {
        validate_repo_fields(repo)?;
        for pattern in &repo.lfs_patterns {
            if let Err(e) = validate_pattern(pattern) {
                tracing::warn!("Repository '{}': {}", repo.name, e);
            }
        }
        if !names.insert(repo.name.as_str()) {
            return Err(GittyCatError::Config(format!(
                "Duplicate repository name '{}'",
                repo.name
            )));
        }
    }

    Ok(())
}
