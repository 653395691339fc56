pub mod bootstrap;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod orchestrator;
pub mod process;
pub mod scheduler;
pub mod session;
pub mod sync;

#[cfg(test)]
mod testing;

pub use config::expand_tilde;
pub use config::get_config_path;
pub use config::load_config_from;
pub use config::save_config_to;
pub use config::AppConfig;
pub use config::RepoConfig;

pub use error::{Diagnostic, GittyCatError, Result};

pub use bootstrap::bootstrap_repository;
pub use git::GitCli;
pub use orchestrator::Orchestrator;
pub use process::{CommandRunner, SystemRunner};
pub use scheduler::Scheduler;
pub use session::{LogStore, SessionState};
pub use sync::{
    sync_repository, CycleReport, RepositoryDescriptor, SyncConfiguration, SyncFailure,
    SyncOptions, SyncOutcome, SyncStep, SyncSuccess,
};
