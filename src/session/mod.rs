pub mod log;
pub mod state;

pub use log::LogStore;
pub use state::{CycleGuard, SessionState};
