use clap::Parser;

use gittycat::cli::{Args, Commands};
use gittycat::commands;
use gittycat::config::resolve_config_path;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => {
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> gittycat::Result<i32> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("GITTYCAT_LOG").unwrap_or_else(|_| "info".to_string()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config_path = resolve_config_path(args.config.as_deref())?;

    match args.command {
        Commands::Run { sync_now, paused } => {
            commands::run_daemon(&config_path, sync_now, paused).await
        }
        Commands::Sync { json } => commands::sync_once(&config_path, json).await,
        Commands::Bootstrap { names } => {
            commands::bootstrap_repositories(&config_path, &names).await
        }
        Commands::Status { porcelain, json } => {
            commands::show_status(&config_path, porcelain, json).await?;
            Ok(0)
        }
        Commands::Repo { action } => commands::handle_repo_command(&config_path, action).await,
        Commands::Config { action } => {
            commands::handle_config_command(&config_path, action)?;
            Ok(0)
        }
        Commands::Doctor => commands::run_doctor(&config_path).await,
    }
}
