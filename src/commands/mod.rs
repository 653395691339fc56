pub mod bootstrap;
pub mod config;
pub mod doctor;
pub mod repo;
pub mod run;
pub mod status;
pub mod sync;

pub use bootstrap::bootstrap_repositories;
pub use config::handle_config_command;
pub use doctor::run_doctor;
pub use repo::handle_repo_command;
pub use run::run_daemon;
pub use status::show_status;
pub use sync::sync_once;

use crate::config::load_config_from;
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::process::SystemRunner;
use crate::session::SessionState;
use crate::sync::{CycleReport, SyncConfiguration, SyncOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const LOG_FILE_NAME: &str = "gittycat.log";

/// Process runner for every command. Git must never stop to ask for
/// credentials because nobody is there to answer.
pub fn system_runner() -> SystemRunner {
    SystemRunner::new().with_env("GIT_TERMINAL_PROMPT", "0")
}

pub fn load_runtime_config(config_path: &Path) -> Result<SyncConfiguration> {
    load_config_from(config_path).map(|config| SyncConfiguration::from(&config))
}

/// Orchestrator for a one-shot command. A config that fails to load is an
/// error here rather than an empty session.
pub fn open_session(config_path: &Path) -> Result<Arc<Orchestrator<SystemRunner>>> {
    let config = load_runtime_config(config_path)?;
    let orchestrator = Orchestrator::new(system_runner(), Arc::new(SessionState::new()));
    orchestrator.set_configuration(config);
    Ok(Arc::new(orchestrator))
}

pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

fn outcome_symbol(outcome: &SyncOutcome) -> &'static str {
    if outcome.is_success() {
        "\u{2713}"
    } else {
        "\u{2717}"
    }
}

pub(crate) fn print_report(report: &CycleReport, json: bool) -> Result<()> {
    if json {
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                SyncOutcome::Success(s) => serde_json::json!({
                    "repository": s.repository,
                    "result": outcome.as_str(),
                    "committed": s.committed,
                }),
                SyncOutcome::Failure(f) => serde_json::json!({
                    "repository": f.repository,
                    "result": outcome.as_str(),
                    "step": f.step.as_str(),
                    "error": f.diagnostic.to_string(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string(&outcomes)?);
        return Ok(());
    }

    if report.outcomes.is_empty() {
        println!("No repositories configured");
        return Ok(());
    }

    for outcome in &report.outcomes {
        match outcome {
            SyncOutcome::Success(s) => {
                let detail = if s.committed { "committed, pushed" } else { "pushed" };
                println!("{} {} - {}", outcome_symbol(outcome), s.repository, detail);
            }
            SyncOutcome::Failure(f) => {
                println!(
                    "{} {} - {}: {}",
                    outcome_symbol(outcome),
                    f.repository,
                    outcome.as_str(),
                    f.diagnostic
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn report_exit_code(report: &CycleReport) -> i32 {
    if report.is_success() {
        0
    } else {
        1
    }
}
