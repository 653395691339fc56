use crate::cli::ConfigAction;
use crate::config::{create_default_if_missing, load_config_from};
use crate::error::Result;
use std::path::Path;

pub fn handle_config_command(config_path: &Path, action: Option<ConfigAction>) -> Result<()> {
    match action {
        Some(ConfigAction::Path) => {
            println!("Config location: {}", config_path.display());
        }
        Some(ConfigAction::Init) => {
            if !create_default_if_missing(config_path)? {
                println!("Config already exists at {}", config_path.display());
            }
        }
        None | Some(ConfigAction::Show) => {
            let config = load_config_from(config_path)?;
            println!("Config file: {}", config_path.display());
            if !config_path.exists() {
                println!("  (not created yet, showing defaults)");
            }
            println!();
            println!("Current configuration:");
            println!("  intervalMinutes: {}", config.interval_minutes);
            println!("  commitMessage: {}", config.commit_message);
            println!("  allowDirtyWorktrees: {}", config.allow_dirty_worktrees);
            println!("  repos:");
            if config.repos.is_empty() {
                println!("    (none)");
            }
            for repo in &config.repos {
                println!("    {}:", repo.name);
                println!("      path: {}", repo.path);
                println!("      remote: {}", repo.remote);
                println!("      branch: {}", repo.branch);
                if !repo.lfs_patterns.is_empty() {
                    println!("      lfsPatterns: {:?}", repo.lfs_patterns);
                }
            }
        }
    }
    Ok(())
}
