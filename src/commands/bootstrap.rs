use super::{open_session, print_report, report_exit_code};
use crate::error::{GittyCatError, Result};
use std::path::Path;

/// Bootstrap the named repositories, or every configured one when `names`
/// is empty.
pub async fn bootstrap_repositories(config_path: &Path, names: &[String]) -> Result<i32> {
    let orchestrator = open_session(config_path)?;
    let report = orchestrator.bootstrap(names).await.ok_or_else(|| {
        GittyCatError::Config("A sync cycle is already running".to_string())
    })?;
    print_report(&report, false)?;
    Ok(report_exit_code(&report))
}
