use super::{load_runtime_config, system_runner};
use crate::error::Result;
use crate::git::GitCli;
use crate::process::CommandRunner;
use crate::session::LogStore;
use crate::sync::SyncConfiguration;
use std::path::Path;
use std::sync::Arc;

struct DiagnosticCheck {
    name: String,
    status: DiagnosticStatus,
    details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagnosticStatus {
    Ok,
    Warning,
    Error,
}

impl DiagnosticCheck {
    fn ok(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DiagnosticStatus::Ok,
            details: Some(details.into()),
        }
    }

    fn warning(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DiagnosticStatus::Warning,
            details: Some(details.into()),
        }
    }

    fn error(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DiagnosticStatus::Error,
            details: Some(details.into()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            DiagnosticStatus::Ok => "\u{2713}",
            DiagnosticStatus::Warning => "\u{26a0}",
            DiagnosticStatus::Error => "\u{2717}",
        }
    }
}

/// Print diagnostics. Returns 1 when any check is an error.
pub async fn run_doctor(config_path: &Path) -> Result<i32> {
    println!();
    println!("GittyCat Diagnostics");
    println!("====================");
    println!();

    let git = GitCli::new(system_runner(), Arc::new(LogStore::new()));
    let mut checks: Vec<DiagnosticCheck> = Vec::new();
    let mut suggestions: Vec<String> = Vec::new();

    let git_check = check_git(&git).await;
    if git_check.status == DiagnosticStatus::Error {
        suggestions.push("Install git and make sure it is on PATH".to_string());
    }
    checks.push(git_check);

    let (config_check, config) = check_config(config_path);
    if config_check.status == DiagnosticStatus::Warning {
        suggestions.push("Create config: gittycat config init".to_string());
    }
    checks.push(config_check);

    let needs_lfs = config
        .as_ref()
        .is_some_and(|c| c.repositories.iter().any(|r| !r.large_file_patterns.is_empty()));
    let lfs_check = check_lfs(&git, needs_lfs).await;
    if lfs_check.status != DiagnosticStatus::Ok {
        suggestions.push("Install Git LFS: https://git-lfs.com".to_string());
    }
    checks.push(lfs_check);

    if let Some(config) = &config {
        let repo_checks = check_repositories(config);
        if repo_checks
            .iter()
            .any(|c| c.status == DiagnosticStatus::Warning)
        {
            suggestions.push("Run 'gittycat bootstrap' to initialise repositories".to_string());
        }
        checks.extend(repo_checks);
    }

    for check in &checks {
        let details = check.details.as_deref().unwrap_or("");
        println!("{} {} - {}", check.symbol(), check.name, details);
    }

    if !suggestions.is_empty() {
        println!();
        println!("Suggestions:");
        for suggestion in &suggestions {
            println!("  -> {}", suggestion);
        }
    }

    println!();

    let failed = checks.iter().any(|c| c.status == DiagnosticStatus::Error);
    Ok(if failed { 1 } else { 0 })
}

async fn check_git<R: CommandRunner>(git: &GitCli<R>) -> DiagnosticCheck {
    match git.version().await {
        Ok(out) => {
            let version_str = out.trim();
            let version = version_str
                .strip_prefix("git version ")
                .unwrap_or(version_str);
            DiagnosticCheck::ok(format!("Git {}", version), "found in PATH")
        }
        Err(_) => DiagnosticCheck::error("Git", "not found in PATH"),
    }
}

async fn check_lfs<R: CommandRunner>(git: &GitCli<R>, required: bool) -> DiagnosticCheck {
    match git.lfs_version().await {
        Ok(out) => DiagnosticCheck::ok("Git LFS", out.trim().to_string()),
        Err(_) if required => DiagnosticCheck::error(
            "Git LFS",
            "not installed, but some repositories have large-file patterns",
        ),
        Err(_) => DiagnosticCheck::warning("Git LFS", "not installed (only needed for lfsPatterns)"),
    }
}

fn check_config(config_path: &Path) -> (DiagnosticCheck, Option<SyncConfiguration>) {
    if !config_path.exists() {
        return (
            DiagnosticCheck::warning(
                "Config file",
                format!("not found at {}", config_path.display()),
            ),
            None,
        );
    }

    match load_runtime_config(config_path) {
        Ok(config) => {
            let check = DiagnosticCheck::ok(
                "Config file",
                format!(
                    "{} (valid, {} repositories)",
                    config_path.display(),
                    config.repositories.len()
                ),
            );
            (check, Some(config))
        }
        Err(e) => (DiagnosticCheck::error("Config file", e.to_string()), None),
    }
}

fn check_repositories(config: &SyncConfiguration) -> Vec<DiagnosticCheck> {
    config
        .repositories
        .iter()
        .map(|repo| {
            let name = format!("Repository '{}'", repo.name);
            let path = &repo.local_path;
            if !path.is_dir() {
                DiagnosticCheck::error(name, format!("missing path {}", path.display()))
            } else if !path.join(".git").exists() {
                DiagnosticCheck::warning(name, format!("{} is not a repository", path.display()))
            } else {
                DiagnosticCheck::ok(name, path.display().to_string())
            }
        })
        .collect()
}
