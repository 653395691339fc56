use super::log::LogStore;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const STATUS_IDLE: &str = "Idle";

/// Process-wide view of what the sync engine is doing.
///
/// Readers may observe it at any time, including mid-cycle. Writes happen
/// through the orchestrator while it holds a [`CycleGuard`].
#[derive(Debug)]
pub struct SessionState {
    syncing: AtomicBool,
    status: RwLock<String>,
    last_error: RwLock<Option<String>>,
    config_error: RwLock<Option<String>>,
    log: Arc<LogStore>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            syncing: AtomicBool::new(false),
            status: RwLock::new(STATUS_IDLE.to_string()),
            last_error: RwLock::new(None),
            config_error: RwLock::new(None),
            log: Arc::new(LogStore::new()),
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn status(&self) -> String {
        self.status.read().clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Why the configuration store could not be read, if it could not.
    ///
    /// Kept apart from [`SessionState::last_error`]: cycles never clear it,
    /// only a successful reload does.
    pub fn config_error(&self) -> Option<String> {
        self.config_error.read().clone()
    }

    pub fn log(&self) -> &LogStore {
        &self.log
    }

    pub fn log_handle(&self) -> Arc<LogStore> {
        Arc::clone(&self.log)
    }

    /// Claim the single in-flight cycle slot.
    ///
    /// Returns `None` when another cycle already holds it. The slot is
    /// released when the returned guard is dropped.
    pub fn try_begin_cycle(&self) -> Option<CycleGuard<'_>> {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CycleGuard { state: self })
    }

    pub(crate) fn set_status(&self, status: impl Into<String>) {
        *self.status.write() = status.into();
    }

    pub(crate) fn set_error(&self, error: impl Into<String>) {
        *self.last_error.write() = Some(error.into());
    }

    pub(crate) fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    pub(crate) fn set_config_error(&self, error: impl Into<String>) {
        *self.config_error.write() = Some(error.into());
    }

    pub(crate) fn clear_config_error(&self) {
        *self.config_error.write() = None;
    }
}

/// Held for the duration of one cycle.
#[derive(Debug)]
pub struct CycleGuard<'a> {
    state: &'a SessionState,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.state.syncing.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = SessionState::new();
        assert!(!state.is_syncing());
        assert_eq!(state.status(), STATUS_IDLE);
        assert_eq!(state.last_error(), None);
        assert_eq!(state.config_error(), None);
        assert!(state.log().is_empty());
    }

    #[test]
    fn test_second_cycle_is_rejected_while_first_is_held() {
        let state = SessionState::new();
        let guard = state.try_begin_cycle().expect("first cycle should start");
        assert!(state.is_syncing());
        assert!(state.try_begin_cycle().is_none());

        drop(guard);
        assert!(!state.is_syncing());
        assert!(state.try_begin_cycle().is_some());
    }

    #[test]
    fn test_error_can_be_set_and_cleared() {
        let state = SessionState::new();
        state.set_error("push failed");
        assert_eq!(state.last_error().as_deref(), Some("push failed"));
        state.clear_error();
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_config_error_is_independent_of_cycle_error() {
        let state = SessionState::new();
        state.set_config_error("Config load failed: bad json");
        state.set_error("push failed");

        state.clear_error();
        assert_eq!(
            state.config_error().as_deref(),
            Some("Config load failed: bad json")
        );

        state.set_error("push failed");
        state.clear_config_error();
        assert_eq!(state.config_error(), None);
        assert_eq!(state.last_error().as_deref(), Some("push failed"));
    }
}
