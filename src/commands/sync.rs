use super::{open_session, print_report, report_exit_code};
use crate::error::{GittyCatError, Result};
use std::path::Path;

pub async fn sync_once(config_path: &Path, json: bool) -> Result<i32> {
    let orchestrator = open_session(config_path)?;
    let report = orchestrator.sync_all().await.ok_or_else(|| {
        GittyCatError::Config("A sync cycle is already running".to_string())
    })?;
    print_report(&report, json)?;
    Ok(report_exit_code(&report))
}
