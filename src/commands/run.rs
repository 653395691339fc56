//! Foreground daemon: the timer plus signal handling.
//!
//! SIGHUP reloads the config and re-arms the timer, SIGUSR1 syncs now,
//! SIGUSR2 toggles automatic sync. Ctrl-C or SIGTERM shut down after the
//! running cycle finishes and the session log is exported.

use super::{default_log_path, load_runtime_config, system_runner};
use crate::config::{create_default_if_missing, DEFAULT_INTERVAL_MINUTES};
use crate::error::Result;
use crate::orchestrator::Orchestrator;
use crate::process::CommandRunner;
use crate::scheduler::Scheduler;
use crate::session::SessionState;
use crate::sync::SyncConfiguration;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(120);
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

pub async fn run_daemon(config_path: &Path, sync_now: bool, paused: bool) -> Result<i32> {
    let orchestrator = Arc::new(Orchestrator::new(
        system_runner(),
        Arc::new(SessionState::new()),
    ));
    orchestrator.apply_loaded_configuration(load_startup_config(config_path));

    let scheduler = Scheduler::new(Arc::clone(&orchestrator));
    if paused {
        scheduler.set_enabled(false);
    }
    scheduler.start(current_interval(&orchestrator))?;
    tracing::info!(
        "GittyCat running with config {} ({})",
        config_path.display(),
        orchestrator.state().status()
    );

    if sync_now {
        trigger_sync(&orchestrator);
    }

    wait_for_shutdown(config_path, &orchestrator, &scheduler).await?;

    scheduler.stop();
    wait_for_cycle(orchestrator.state()).await;

    let log_path = default_log_path();
    orchestrator.state().log().export(&log_path)?;
    eprintln!("Session log written to {}", log_path.display());
    Ok(0)
}

/// First load of a daemon session. Writes the default configuration when
/// none exists yet.
fn load_startup_config(config_path: &Path) -> Result<SyncConfiguration> {
    if let Err(e) = create_default_if_missing(config_path) {
        tracing::warn!("Could not create default config: {}", e);
    }
    load_runtime_config(config_path)
}

fn current_interval<R: CommandRunner>(orchestrator: &Orchestrator<R>) -> Duration {
    let seconds = orchestrator
        .configuration()
        .map(|c| c.interval_seconds)
        .unwrap_or(DEFAULT_INTERVAL_MINUTES * 60);
    Duration::from_secs(seconds)
}

fn trigger_sync<R: CommandRunner + 'static>(orchestrator: &Arc<Orchestrator<R>>) {
    let orchestrator = Arc::clone(orchestrator);
    tokio::spawn(async move {
        if orchestrator.sync_all().await.is_none() {
            tracing::info!("Sync request ignored ({})", orchestrator.state().status());
        }
    });
}

fn reload<R: CommandRunner + 'static>(
    config_path: &Path,
    orchestrator: &Orchestrator<R>,
    scheduler: &Scheduler<R>,
) {
    tracing::info!("Reloading config from {}", config_path.display());
    orchestrator.apply_loaded_configuration(load_runtime_config(config_path));
    if let Err(e) = scheduler.restart(current_interval(orchestrator)) {
        tracing::error!("Failed to restart auto-sync: {}", e);
    }
}

#[cfg(unix)]
async fn wait_for_shutdown<R: CommandRunner + 'static>(
    config_path: &Path,
    orchestrator: &Arc<Orchestrator<R>>,
    scheduler: &Scheduler<R>,
) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut sync_now = signal(SignalKind::user_defined1())?;
    let mut toggle = signal(SignalKind::user_defined2())?;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                tracing::info!("Received ctrl-c, shutting down");
                return Ok(());
            }
            _ = terminate.recv() => {
                tracing::info!("Received SIGTERM, shutting down");
                return Ok(());
            }
            _ = hangup.recv() => reload(config_path, orchestrator, scheduler),
            _ = sync_now.recv() => trigger_sync(orchestrator),
            _ = toggle.recv() => {
                let enabled = scheduler.toggle();
                tracing::info!("Auto-sync {}", if enabled { "enabled" } else { "disabled" });
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown<R: CommandRunner + 'static>(
    _config_path: &Path,
    _orchestrator: &Arc<Orchestrator<R>>,
    _scheduler: &Scheduler<R>,
) -> Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received ctrl-c, shutting down");
    Ok(())
}

async fn wait_for_cycle(state: &SessionState) {
    if !state.is_syncing() {
        return;
    }
    tracing::info!("Waiting for the running sync to finish");
    let waited = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while state.is_syncing() {
            tokio::time::sleep(SHUTDOWN_POLL).await;
        }
    })
    .await;
    if waited.is_err() {
        tracing::warn!("Gave up waiting for the running sync");
    }
}
