use crate::error::{GittyCatError, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const CONFIG_DIR_ENV: &str = "GITTYCAT_CONFIG_DIR";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub fn expand_tilde(path: &str) -> PathBuf {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    } else if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    }
    PathBuf::from(path)
}

pub fn get_config_dir() -> Result<PathBuf> {
    if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(config_dir));
    }

    let project_dirs = ProjectDirs::from("com", "gittycat", "GittyCat").ok_or_else(|| {
        GittyCatError::Config("Could not determine config directory".to_string())
    })?;

    Ok(project_dirs.config_dir().to_path_buf())
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// The explicit path when one was given on the command line, otherwise the
/// default location.
pub fn resolve_config_path(explicit: Option<&std::path::Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => get_config_path(),
    }
}
