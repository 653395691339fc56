use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GittyCatError>;

#[derive(Error, Debug)]
pub enum GittyCatError {
    #[error("{0}")]
    Process(Diagnostic),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for GittyCatError {
    fn from(err: serde_json::Error) -> Self {
        GittyCatError::Json(err.to_string())
    }
}

impl From<Diagnostic> for GittyCatError {
    fn from(diagnostic: Diagnostic) -> Self {
        GittyCatError::Process(diagnostic)
    }
}

/// Failure report from one external command.
///
/// `exit_code` is `None` when the process never started (binary missing,
/// permission denied). Otherwise it carries the non-zero exit status and
/// `message` holds stderr, or stdout when stderr was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub command: String,
    pub exit_code: Option<i32>,
    pub message: String,
}

impl Diagnostic {
    pub fn spawn_failed(command: impl Into<String>, err: &std::io::Error) -> Self {
        let command = command.into();
        Self {
            message: format!("Failed to execute '{}': {}", command, err),
            command,
            exit_code: None,
        }
    }

    /// A failure detected without running any command.
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            command: String::new(),
            exit_code: None,
            message: message.into(),
        }
    }

    pub fn exited(command: impl Into<String>, exit_code: Option<i32>, message: String) -> Self {
        Self {
            command: command.into(),
            exit_code,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.trim();
        match self.exit_code {
            Some(code) => write!(f, "'{}' exited with {}: {}", self.command, code, message),
            None => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for Diagnostic {}
