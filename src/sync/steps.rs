//! Named protocol steps and what happens when each one fails.

use super::types::SyncFailure;
use crate::error::Diagnostic;
use crate::session::LogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPolicy {
    /// Failure aborts the repository and becomes its outcome.
    Fatal,
    /// Failure is logged and discarded.
    BestEffort,
    /// Only success or failure matters; failure is an answer, not an error.
    Probe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStep {
    ValidateDescriptor,
    VerifyPath,
    CreateDirectory,
    DetectRepository,
    InitRepository,
    ConfigureRemote,
    AddRemote,
    ResolveBranch,
    CheckoutBranch,
    DetectHistory,
    RenameBranch,
    Rebase,
    LfsInstall,
    LfsTrack,
    StageAttributes,
    StageAll,
    InspectStatus,
    Commit,
    Push,
}

impl SyncStep {
    pub fn policy(&self) -> StepPolicy {
        match self {
            SyncStep::DetectRepository | SyncStep::ResolveBranch | SyncStep::DetectHistory => {
                StepPolicy::Probe
            }
            SyncStep::ConfigureRemote
            | SyncStep::AddRemote
            | SyncStep::Rebase
            | SyncStep::LfsInstall
            | SyncStep::LfsTrack
            | SyncStep::StageAttributes => StepPolicy::BestEffort,
            SyncStep::ValidateDescriptor
            | SyncStep::VerifyPath
            | SyncStep::CreateDirectory
            | SyncStep::InitRepository
            | SyncStep::CheckoutBranch
            | SyncStep::RenameBranch
            | SyncStep::StageAll
            | SyncStep::InspectStatus
            | SyncStep::Commit
            | SyncStep::Push => StepPolicy::Fatal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStep::ValidateDescriptor => "validate",
            SyncStep::VerifyPath => "verify path",
            SyncStep::CreateDirectory => "create directory",
            SyncStep::DetectRepository => "detect repository",
            SyncStep::InitRepository => "init",
            SyncStep::ConfigureRemote => "set remote",
            SyncStep::AddRemote => "add remote",
            SyncStep::ResolveBranch => "resolve branch",
            SyncStep::CheckoutBranch => "checkout branch",
            SyncStep::DetectHistory => "detect history",
            SyncStep::RenameBranch => "rename branch",
            SyncStep::Rebase => "rebase",
            SyncStep::LfsInstall => "lfs install",
            SyncStep::LfsTrack => "lfs track",
            SyncStep::StageAttributes => "stage .gitattributes",
            SyncStep::StageAll => "stage",
            SyncStep::InspectStatus => "status",
            SyncStep::Commit => "commit",
            SyncStep::Push => "push",
        }
    }
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Applies [`StepPolicy`] to step results for one repository.
pub struct StepRunner<'a> {
    repository: &'a str,
    log: &'a LogStore,
}

impl<'a> StepRunner<'a> {
    pub fn new(repository: &'a str, log: &'a LogStore) -> Self {
        Self { repository, log }
    }

    /// `Ok(Some(value))` on success, `Ok(None)` for a swallowed failure,
    /// `Err` when the step is fatal.
    pub fn settle<T>(
        &self,
        step: SyncStep,
        result: std::result::Result<T, Diagnostic>,
    ) -> std::result::Result<Option<T>, SyncFailure> {
        let diagnostic = match result {
            Ok(value) => return Ok(Some(value)),
            Err(diagnostic) => diagnostic,
        };

        match step.policy() {
            StepPolicy::Fatal => Err(self.failure(step, diagnostic)),
            StepPolicy::BestEffort => {
                tracing::warn!("[{}] {} skipped: {}", self.repository, step, diagnostic);
                self.log.append(format!(
                    "[{}] {} skipped: {}",
                    self.repository,
                    step,
                    diagnostic.message.trim()
                ));
                Ok(None)
            }
            StepPolicy::Probe => {
                tracing::debug!("[{}] {} probe negative: {}", self.repository, step, diagnostic);
                Ok(None)
            }
        }
    }

    pub fn failure(&self, step: SyncStep, diagnostic: Diagnostic) -> SyncFailure {
        SyncFailure {
            repository: self.repository.to_string(),
            step,
            diagnostic,
        }
    }

    pub fn note(&self, message: impl AsRef<str>) {
        self.log.append(format!("[{}] {}", self.repository, message.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(message: &str) -> Diagnostic {
        Diagnostic::exited("git something", Some(1), message.to_string())
    }

    #[test]
    fn test_fatal_step_produces_failure() {
        let log = LogStore::new();
        let steps = StepRunner::new("notes", &log);
        let err = steps
            .settle::<String>(SyncStep::Push, Err(diag("rejected")))
            .expect_err("push failure is fatal");
        assert_eq!(err.step, SyncStep::Push);
        assert_eq!(err.repository, "notes");
    }

    #[test]
    fn test_best_effort_step_is_logged_and_swallowed() {
        let log = LogStore::new();
        let steps = StepRunner::new("notes", &log);
        let settled = steps
            .settle::<String>(SyncStep::Rebase, Err(diag("no such ref")))
            .expect("rebase failure is not fatal");
        assert!(settled.is_none());
        assert_eq!(log.count_matching("[notes] rebase skipped: no such ref"), 1);
    }

    #[test]
    fn test_probe_failure_is_silent() {
        let log = LogStore::new();
        let steps = StepRunner::new("notes", &log);
        let settled = steps
            .settle::<String>(SyncStep::DetectHistory, Err(diag("bad revision")))
            .expect("probe failure is not fatal");
        assert!(settled.is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_success_passes_value_through() {
        let log = LogStore::new();
        let steps = StepRunner::new("notes", &log);
        let settled = steps
            .settle(SyncStep::Commit, Ok("done".to_string()))
            .expect("success");
        assert_eq!(settled.as_deref(), Some("done"));
    }

    #[test]
    fn test_best_effort_allow_list() {
        let best_effort: Vec<SyncStep> = [
            SyncStep::ConfigureRemote,
            SyncStep::AddRemote,
            SyncStep::Rebase,
            SyncStep::LfsInstall,
            SyncStep::LfsTrack,
            SyncStep::StageAttributes,
        ]
        .into_iter()
        .filter(|s| s.policy() == StepPolicy::BestEffort)
        .collect();
        assert_eq!(best_effort.len(), 6);
        assert_eq!(SyncStep::Commit.policy(), StepPolicy::Fatal);
        assert_eq!(SyncStep::InitRepository.policy(), StepPolicy::Fatal);
        assert_eq!(SyncStep::VerifyPath.policy(), StepPolicy::Fatal);
    }
}
