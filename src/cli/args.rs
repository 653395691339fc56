use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gittycat", version)]
#[command(about = "Back up folders to git remotes on a timer")]
pub struct Args {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Use this config file instead of the default location"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run in the foreground, syncing on the configured interval")]
    Run {
        #[arg(long, help = "Run one sync cycle immediately on startup")]
        sync_now: bool,

        #[arg(long, help = "Start with automatic sync turned off")]
        paused: bool,
    },
    #[command(about = "Sync every configured repository once")]
    Sync {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    #[command(about = "Initialise and link repositories to their remotes")]
    Bootstrap {
        #[arg(help = "Repositories to bootstrap (default: all)")]
        names: Vec<String>,
    },
    #[command(about = "Show the local state of each configured repository")]
    Status {
        #[arg(long, help = "Machine-readable output (tab-separated values)")]
        porcelain: bool,

        #[arg(long, help = "JSON output")]
        json: bool,
    },
    #[command(about = "Manage tracked repositories")]
    Repo {
        #[command(subcommand)]
        action: RepoAction,
    },
    #[command(about = "Manage configuration")]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    #[command(about = "Diagnose common issues and system state")]
    Doctor,
}

#[derive(Subcommand, Debug)]
pub enum RepoAction {
    #[command(about = "Add a repository, or replace one with the same name")]
    Add {
        #[arg(help = "Display name")]
        name: String,

        #[arg(help = "Local folder")]
        path: String,

        #[arg(help = "Remote URL")]
        remote: String,

        #[arg(long, default_value = crate::sync::DEFAULT_BRANCH, help = "Branch to push")]
        branch: String,

        #[arg(
            long,
            value_name = "PATTERNS",
            help = "Comma-separated patterns to store with Git LFS, e.g. \"*.psd,*.zip\""
        )]
        lfs: Option<String>,

        #[arg(long, help = "Bootstrap the repository after saving")]
        bootstrap: bool,
    },
    #[command(about = "Stop tracking a repository")]
    Remove {
        #[arg(help = "Display name")]
        name: String,
    },
    #[command(about = "List tracked repositories")]
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    #[command(about = "Show current configuration values")]
    Show,
    #[command(about = "Show config file path")]
    Path,
    #[command(about = "Write the default config if none exists")]
    Init,
}
