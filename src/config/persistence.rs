use crate::error::{GittyCatError, Result};
use std::path::Path;

use crate::config::schema::*;
use crate::config::validation::validate_config;

/// Read and validate the configuration at `path`. A missing file yields the
/// defaults without writing anything.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        GittyCatError::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config: AppConfig = serde_json::from_str(&content)
        .map_err(|e| GittyCatError::Config(format!("Failed to parse config: {}", e)))?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate and write `config` to `path`. The file is replaced atomically so
/// a crash never leaves a truncated config behind.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    validate_config(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            GittyCatError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| GittyCatError::Config(format!("Failed to serialize config: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json)
        .map_err(|e| GittyCatError::Config(format!("Failed to write config file: {}", e)))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| GittyCatError::Config(format!("Failed to replace config file: {}", e)))?;

    tracing::debug!("Saved config to {}", path.display());
    Ok(())
}

/// Write the default configuration if `path` does not exist yet. Returns
/// whether a file was created.
pub fn create_default_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config_to(&AppConfig::default(), path)?;
    eprintln!("Created default config at {}", path.display());
    Ok(true)
}
