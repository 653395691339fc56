use super::open_session;
use crate::error::Result;
use crate::git::{count_pending_changes, GitCli};
use crate::process::CommandRunner;
use crate::sync::SyncConfiguration;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatus {
    pub name: String,
    pub path: String,
    pub exists: bool,
    pub is_repository: bool,
    pub branch: Option<String>,
    pub pending_changes: Option<usize>,
}

impl RepoStatus {
    pub fn state(&self) -> &'static str {
        if !self.exists {
            "missing"
        } else if !self.is_repository {
            "not a repository"
        } else if self.pending_changes.unwrap_or(0) > 0 {
            "dirty"
        } else {
            "clean"
        }
    }
}

pub async fn collect_status<R: CommandRunner>(
    git: &GitCli<R>,
    config: &SyncConfiguration,
) -> Vec<RepoStatus> {
    let mut statuses = Vec::with_capacity(config.repositories.len());
    for repo in &config.repositories {
        let path = repo.local_path.as_path();
        let mut status = RepoStatus {
            name: repo.name.clone(),
            path: path.display().to_string(),
            exists: path.is_dir(),
            is_repository: false,
            branch: None,
            pending_changes: None,
        };

        if status.exists {
            status.is_repository = path.join(".git").exists() && git.git_dir(path).await.is_ok();
        }
        if status.is_repository {
            status.branch = git.current_branch(path).await.ok();
            status.pending_changes = git
                .status_porcelain(path)
                .await
                .ok()
                .map(|out| count_pending_changes(&out));
        }
        statuses.push(status);
    }
    statuses
}

pub async fn show_status(config_path: &Path, porcelain: bool, json: bool) -> Result<()> {
    let orchestrator = open_session(config_path)?;
    let Some(config) = orchestrator.configuration() else {
        return Ok(());
    };
    let statuses = collect_status(orchestrator.git(), &config).await;

    if json {
        println!("{}", serde_json::to_string(&statuses)?);
    } else if porcelain {
        for s in &statuses {
            println!(
                "{}\t{}\t{}\t{}",
                s.name,
                s.path,
                s.state(),
                s.pending_changes.unwrap_or(0)
            );
        }
    } else if statuses.is_empty() {
        println!("No repositories configured");
        println!();
        println!("Add one with: gittycat repo add <name> <path> <remote>");
    } else {
        let name_width = statuses.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for s in &statuses {
            let detail = match (&s.branch, s.pending_changes) {
                (Some(branch), Some(n)) if n > 0 => {
                    format!("{} on {}, {} pending", s.state(), branch, n)
                }
                (Some(branch), _) => format!("{} on {}", s.state(), branch),
                _ => s.state().to_string(),
            };
            println!("{:<width$}  {}  {}", s.name, detail, s.path, width = name_width);
        }
    }
    Ok(())
}
