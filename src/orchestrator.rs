//! Drives sync and bootstrap over every configured repository.
//!
//! At most one cycle runs at a time. A call made while a cycle is in flight
//! returns `None` immediately and leaves the running cycle untouched.
//! Repositories are processed strictly in declaration order, one at a time,
//! and a failure in one never prevents the others from being attempted.

use crate::bootstrap::bootstrap_repository;
use crate::error::{Diagnostic, Result};
use crate::git::GitCli;
use crate::process::CommandRunner;
use crate::session::SessionState;
use crate::sync::{
    sync_repository, CycleReport, RepositoryDescriptor, SyncConfiguration, SyncFailure,
    SyncOptions, SyncOutcome, SyncStep,
};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct Orchestrator<R> {
    git: GitCli<R>,
    state: Arc<SessionState>,
    config: RwLock<Option<Arc<SyncConfiguration>>>,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(runner: R, state: Arc<SessionState>) -> Self {
        let git = GitCli::new(runner, state.log_handle());
        Self {
            git,
            state,
            config: RwLock::new(None),
        }
    }

    pub fn git(&self) -> &GitCli<R> {
        &self.git
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn configuration(&self) -> Option<Arc<SyncConfiguration>> {
        self.config.read().clone()
    }

    /// Replace the configuration used by the next cycle.
    pub fn set_configuration(&self, config: SyncConfiguration) {
        *self.config.write() = Some(Arc::new(config));
        self.state.set_status("Config loaded");
    }

    /// Install the result of reading the configuration store.
    ///
    /// A load failure is recorded as a session-level error and the session
    /// continues with no repositories configured. Cycles are skipped until a
    /// later load succeeds. Errors from earlier cycles are left alone.
    pub fn apply_loaded_configuration(&self, loaded: Result<SyncConfiguration>) {
        match loaded {
            Ok(config) => {
                self.state.clear_config_error();
                self.set_configuration(config);
            }
            Err(e) => {
                tracing::error!("Config load failed: {}", e);
                *self.config.write() = Some(Arc::new(SyncConfiguration::empty()));
                self.state.set_config_error(format!("Config load failed: {}", e));
                self.state.set_status("Config error");
                self.state.log().append(format!("Config load failed: {}", e));
            }
        }
    }

    /// The configuration a cycle may run against, or `None` while nothing
    /// is configured or the last load failed.
    fn runnable_configuration(&self) -> Option<Arc<SyncConfiguration>> {
        if let Some(error) = self.state.config_error() {
            tracing::debug!("Skipping cycle: {}", error);
            return None;
        }
        self.configuration()
    }

    /// Run one sync cycle over all configured repositories.
    ///
    /// Returns `None` when a cycle is already running, nothing has been
    /// configured yet, or the configuration failed to load. Status and
    /// errors are untouched in those cases.
    pub async fn sync_all(&self) -> Option<CycleReport> {
        let Some(_guard) = self.state.try_begin_cycle() else {
            tracing::debug!("Sync already in progress, ignoring request");
            return None;
        };
        let config = self.runnable_configuration()?;

        self.state.clear_error();
        self.state.set_status("Syncing");

        let total = config.repositories.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, repo) in config.repositories.iter().enumerate() {
            self.state
                .set_status(format!("Syncing {} ({}/{})", repo.name, index + 1, total));
            let outcome =
                sync_repository(&self.git, repo, SyncOptions::from(config.as_ref())).await;
            self.record(&outcome);
            outcomes.push(outcome);
        }

        let report = CycleReport::new(outcomes);
        if report.is_success() {
            self.state
                .set_status(format!("Synced at {}", report.finished_at.format("%H:%M")));
            self.state.log().append("Sync OK");
        } else {
            self.state.set_status(format!(
                "Sync failed ({} of {} repositories)",
                report.failure_count(),
                total
            ));
        }

        Some(report)
    }

    /// Bootstrap the named repositories, or all of them when `names` is empty.
    ///
    /// Shares the single-flight slot with [`Orchestrator::sync_all`]. Unknown
    /// names are reported as failures without touching disk.
    pub async fn bootstrap(&self, names: &[String]) -> Option<CycleReport> {
        let Some(_guard) = self.state.try_begin_cycle() else {
            tracing::debug!("Sync already in progress, ignoring bootstrap request");
            return None;
        };
        let config = self.runnable_configuration()?;

        self.state.clear_error();

        let targets: Vec<std::result::Result<&RepositoryDescriptor, &String>> = if names.is_empty()
        {
            config.repositories.iter().map(Ok).collect()
        } else {
            names
                .iter()
                .map(|name| config.repository(name).ok_or(name))
                .collect()
        };

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = match target {
                Ok(repo) => {
                    self.state.set_status(format!("Bootstrapping {}", repo.name));
                    let outcome = bootstrap_repository(&self.git, repo).await;
                    if outcome.is_success() {
                        self.state.set_status(format!("Bootstrapped {}", repo.name));
                    }
                    outcome
                }
                Err(name) => SyncOutcome::Failure(SyncFailure {
                    repository: name.clone(),
                    step: SyncStep::ValidateDescriptor,
                    diagnostic: Diagnostic::local(format!("No repository named '{}'", name)),
                }),
            };
            self.record(&outcome);
            outcomes.push(outcome);
        }

        let report = CycleReport::new(outcomes);
        if !report.is_success() {
            self.state.set_status(format!(
                "Bootstrap failed ({} of {} repositories)",
                report.failure_count(),
                report.outcomes.len()
            ));
        }
        Some(report)
    }

    fn record(&self, outcome: &SyncOutcome) {
        if let SyncOutcome::Failure(failure) = outcome {
            tracing::warn!("{}", failure);
            self.state.set_error(failure.to_string());
            self.state.log().append(format!("Sync failed: {}", failure));
        }
    }
}
