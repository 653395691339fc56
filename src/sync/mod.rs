//! Incremental sync of one already-tracked repository.

pub mod steps;
pub mod types;

pub use steps::{StepPolicy, StepRunner, SyncStep};
pub(crate) use types::dedup_patterns;
pub use types::{
    CycleReport, RepositoryDescriptor, SyncConfiguration, SyncFailure, SyncOutcome, SyncSuccess,
    DEFAULT_BRANCH,
};

use crate::error::Diagnostic;
use crate::git::GitCli;
use crate::process::CommandRunner;

/// Commit message and dirty-tree policy shared by every repository in a cycle.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions<'a> {
    pub commit_message: &'a str,
    pub allow_dirty_worktrees: bool,
}

impl<'a> From<&'a SyncConfiguration> for SyncOptions<'a> {
    fn from(config: &'a SyncConfiguration) -> Self {
        Self {
            commit_message: &config.commit_message,
            allow_dirty_worktrees: config.allow_dirty_worktrees,
        }
    }
}

/// Bring `repo` up to date with its remote.
///
/// Stops at the first fatal step. A clean working tree is never committed,
/// whatever `allow_dirty_worktrees` says.
pub async fn sync_repository<R: CommandRunner>(
    git: &GitCli<R>,
    repo: &RepositoryDescriptor,
    options: SyncOptions<'_>,
) -> SyncOutcome {
    let steps = StepRunner::new(&repo.name, git.log());
    run_sync(git, repo, options, &steps).await.into()
}

async fn run_sync<R: CommandRunner>(
    git: &GitCli<R>,
    repo: &RepositoryDescriptor,
    options: SyncOptions<'_>,
    steps: &StepRunner<'_>,
) -> Result<SyncSuccess, SyncFailure> {
    let path = repo.local_path.as_path();

    repo.validate()
        .map_err(|e| steps.failure(SyncStep::ValidateDescriptor, Diagnostic::local(e)))?;

    if !path.is_dir() {
        return Err(steps.failure(
            SyncStep::VerifyPath,
            Diagnostic::local(format!("Missing path {}", path.display())),
        ));
    }

    // A missing remote or an unresolvable branch both fall back to
    // recreating the target branch.
    let remote_set = steps
        .settle(
            SyncStep::ConfigureRemote,
            git.remote_set_url(path, &repo.remote_url).await,
        )?
        .is_some();
    let current = if remote_set {
        steps.settle(SyncStep::ResolveBranch, git.current_branch(path).await)?
    } else {
        None
    };

    match current.as_deref() {
        None | Some("HEAD") => {
            steps.settle(
                SyncStep::CheckoutBranch,
                git.checkout_branch(path, &repo.branch).await,
            )?;
        }
        Some(branch) if branch != repo.branch => {
            tracing::warn!(
                "[{}] checked out on '{}', pushing '{}'",
                repo.name,
                branch,
                repo.branch
            );
        }
        Some(_) => {}
    }

    steps.settle(SyncStep::Rebase, git.pull_rebase(path, &repo.branch).await)?;

    if !repo.large_file_patterns.is_empty() {
        track_large_files(git, repo, steps).await?;
    }

    steps.settle(SyncStep::StageAll, git.add_all(path).await)?;

    let status = steps
        .settle(SyncStep::InspectStatus, git.status_porcelain(path).await)?
        .unwrap_or_default();

    let committed = if status.trim().is_empty() {
        if options.allow_dirty_worktrees {
            steps.note("clean, nothing to commit");
        } else {
            steps.note("clean, skipping commit");
        }
        false
    } else {
        steps.settle(
            SyncStep::Commit,
            git.commit(path, options.commit_message).await,
        )?;
        true
    };

    let output = steps
        .settle(SyncStep::Push, git.push(path, &repo.branch).await)?
        .unwrap_or_default();
    steps.note("pushed");

    Ok(SyncSuccess {
        repository: repo.name.clone(),
        committed,
        output,
    })
}

/// Install the large-file filter and register every pattern.
///
/// Each pattern is attempted even when an earlier one failed.
pub(crate) async fn track_large_files<R: CommandRunner>(
    git: &GitCli<R>,
    repo: &RepositoryDescriptor,
    steps: &StepRunner<'_>,
) -> Result<(), SyncFailure> {
    let path = repo.local_path.as_path();

    steps.settle(SyncStep::LfsInstall, git.lfs_install(path).await)?;
    for pattern in &repo.large_file_patterns {
        steps.settle(SyncStep::LfsTrack, git.lfs_track(path, pattern).await)?;
    }
    steps.settle(SyncStep::StageAttributes, git.add_attributes(path).await)?;

    Ok(())
}
