//! Recurring timer that fires sync cycles.
//!
//! There is at most one timer task. Ticks do not wait for the previous cycle;
//! overlapping ones are absorbed by the orchestrator's single-flight guard.

use crate::error::{GittyCatError, Result};
use crate::orchestrator::Orchestrator;
use crate::process::CommandRunner;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

struct Timer {
    enabled: bool,
    interval: Option<Duration>,
    task: Option<JoinHandle<()>>,
}

pub struct Scheduler<R> {
    orchestrator: Arc<Orchestrator<R>>,
    timer: Mutex<Timer>,
}

impl<R: CommandRunner + 'static> Scheduler<R> {
    pub fn new(orchestrator: Arc<Orchestrator<R>>) -> Self {
        Self {
            orchestrator,
            timer: Mutex::new(Timer {
                enabled: true,
                interval: None,
                task: None,
            }),
        }
    }

    /// Arm the timer, replacing any existing one. The first tick fires one
    /// full `interval` from now. Nothing is armed while disabled, but the
    /// interval is remembered for when the scheduler is enabled again.
    pub fn start(&self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(GittyCatError::Config(
                "Sync interval must be greater than zero".to_string(),
            ));
        }

        let mut timer = self.timer.lock();
        if let Some(task) = timer.task.take() {
            task.abort();
        }
        timer.interval = Some(interval);

        if !timer.enabled {
            tracing::debug!("Auto-sync disabled, not arming timer");
            return Ok(());
        }

        tracing::info!("Auto-sync every {}s", interval.as_secs());
        timer.task = Some(spawn_ticker(Arc::clone(&self.orchestrator), interval));
        Ok(())
    }

    pub fn stop(&self) {
        if let Some(task) = self.timer.lock().task.take() {
            tracing::debug!("Stopping auto-sync timer");
            task.abort();
        }
    }

    /// Stop, then start again with a new interval.
    pub fn restart(&self, interval: Duration) -> Result<()> {
        self.stop();
        self.start(interval)
    }

    pub fn set_enabled(&self, enabled: bool) {
        let interval = {
            let mut timer = self.timer.lock();
            timer.enabled = enabled;
            timer.interval
        };

        if !enabled {
            self.stop();
            return;
        }
        if let Some(interval) = interval {
            if let Err(e) = self.start(interval) {
                tracing::warn!("Failed to re-arm auto-sync: {}", e);
            }
        }
    }

    pub fn toggle(&self) -> bool {
        let enabled = !self.is_enabled();
        self.set_enabled(enabled);
        enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.timer.lock().enabled
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn interval(&self) -> Option<Duration> {
        self.timer.lock().interval
    }
}

impl<R> Drop for Scheduler<R> {
    fn drop(&mut self) {
        if let Some(task) = self.timer.get_mut().task.take() {
            task.abort();
        }
    }
}

fn spawn_ticker<R: CommandRunner + 'static>(
    orchestrator: Arc<Orchestrator<R>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            tracing::debug!("Auto-sync tick");
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator.sync_all().await;
            });
        }
    })
}
