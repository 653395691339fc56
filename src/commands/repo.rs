use super::bootstrap_repositories;
use crate::cli::RepoAction;
use crate::config::{
    load_config_from, parse_pattern_list, save_config_to, validate_repo, RepoConfig,
};
use crate::error::{GittyCatError, Result};
use std::path::Path;

pub async fn handle_repo_command(config_path: &Path, action: RepoAction) -> Result<i32> {
    match action {
        RepoAction::Add {
            name,
            path,
            remote,
            branch,
            lfs,
            bootstrap,
        } => {
            let mut repo = RepoConfig::new(name.trim(), path.trim(), remote.trim());
            repo.branch = branch.trim().to_string();
            repo.lfs_patterns = lfs.as_deref().map(parse_pattern_list).unwrap_or_default();
            let name = repo.name.clone();

            add_repo(config_path, repo)?;
            println!("Saved repository '{}'", name);

            if bootstrap {
                return bootstrap_repositories(config_path, &[name]).await;
            }
            Ok(0)
        }
        RepoAction::Remove { name } => {
            remove_repo(config_path, &name)?;
            println!("Removed repository '{}'", name);
            Ok(0)
        }
        RepoAction::List => {
            let config = load_config_from(config_path)?;
            if config.repos.is_empty() {
                println!("No repositories configured");
            }
            for repo in &config.repos {
                print!("{}\t{}\t{}\t{}", repo.name, repo.path, repo.remote, repo.branch);
                if !repo.lfs_patterns.is_empty() {
                    print!("\tlfs: {}", repo.lfs_patterns.join(","));
                }
                println!();
            }
            Ok(0)
        }
    }
}

pub fn add_repo(config_path: &Path, repo: RepoConfig) -> Result<()> {
    validate_repo(&repo)?;
    let mut config = load_config_from(config_path)?;
    config.upsert_repo(repo);
    save_config_to(&config, config_path)
}

pub fn remove_repo(config_path: &Path, name: &str) -> Result<()> {
    let mut config = load_config_from(config_path)?;
    if !config.remove_repo(name) {
        return Err(GittyCatError::Config(format!(
            "No repository named '{}'",
            name
        )));
    }
    save_config_to(&config, config_path)
}
