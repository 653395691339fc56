//! Turns an arbitrary folder into a remote-linked repository with at least
//! one pushed commit. Safe to run again on a folder it already set up.

use crate::error::Diagnostic;
use crate::git::GitCli;
use crate::process::CommandRunner;
use crate::sync::{RepositoryDescriptor, StepRunner, SyncFailure, SyncOutcome, SyncStep, SyncSuccess};
use std::path::Path;

pub const BOOTSTRAP_COMMIT_MESSAGE: &str = "chore(init): bootstrap";

pub async fn bootstrap_repository<R: CommandRunner>(
    git: &GitCli<R>,
    repo: &RepositoryDescriptor,
) -> SyncOutcome {
    let steps = StepRunner::new(&repo.name, git.log());
    run_bootstrap(git, repo, &steps).await.into()
}

async fn run_bootstrap<R: CommandRunner>(
    git: &GitCli<R>,
    repo: &RepositoryDescriptor,
    steps: &StepRunner<'_>,
) -> Result<SyncSuccess, SyncFailure> {
    let path = repo.local_path.as_path();

    repo.validate()
        .map_err(|e| steps.failure(SyncStep::ValidateDescriptor, Diagnostic::local(e)))?;

    std::fs::create_dir_all(path).map_err(|e| {
        steps.failure(
            SyncStep::CreateDirectory,
            Diagnostic::local(format!("Failed to create {}: {}", path.display(), e)),
        )
    })?;

    let detected = steps
        .settle(SyncStep::DetectRepository, git.git_dir(path).await)?
        .is_some();
    // rev-parse also succeeds inside an enclosing repository; only a
    // repository rooted at this folder counts.
    if !(detected && owns_git_dir(path)) {
        steps.settle(SyncStep::InitRepository, git.init(path).await)?;
    }

    let remote_set = steps
        .settle(
            SyncStep::ConfigureRemote,
            git.remote_set_url(path, &repo.remote_url).await,
        )?
        .is_some();
    if !remote_set {
        steps.settle(
            SyncStep::AddRemote,
            git.remote_add(path, &repo.remote_url).await,
        )?;
    }

    let has_history = steps
        .settle(SyncStep::DetectHistory, git.verify_head(path).await)?
        .is_some();
    let committed = !has_history;
    if !has_history {
        steps.settle(SyncStep::StageAll, git.add_all(path).await)?;
        steps.settle(
            SyncStep::Commit,
            git.commit_allow_empty(path, BOOTSTRAP_COMMIT_MESSAGE).await,
        )?;
        steps.settle(
            SyncStep::RenameBranch,
            git.rename_branch(path, &repo.branch).await,
        )?;
    }

    steps.settle(SyncStep::Rebase, git.pull_rebase(path, &repo.branch).await)?;

    let output = steps
        .settle(SyncStep::Push, git.push_upstream(path, &repo.branch).await)?
        .unwrap_or_default();
    steps.note("bootstrapped");

    Ok(SyncSuccess {
        repository: repo.name.clone(),
        committed,
        output,
    })
}

fn owns_git_dir(path: &Path) -> bool {
    path.join(".git").exists()
}
