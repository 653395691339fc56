pub mod paths;
pub mod persistence;
pub mod schema;
pub mod validation;

pub use paths::*;
pub use persistence::*;
pub use schema::*;
pub use validation::*;

pub const DEFAULT_INTERVAL_MINUTES: u64 = 15;
pub const MIN_INTERVAL_MINUTES: u64 = 1;
pub const MAX_INTERVAL_MINUTES: u64 = 720;
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore(sync): automatic backup";

fn default_interval_minutes() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

fn default_branch() -> String {
    crate::sync::DEFAULT_BRANCH.to_string()
}
