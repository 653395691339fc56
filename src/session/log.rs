use crate::error::Result;
use chrono::{Local, SecondsFormat};
use parking_lot::Mutex;
use std::path::Path;

/// Append-only sequence of timestamped lines shown to the user.
///
/// Each line is `[<timestamp>] <message>`. Appends are safe from any task.
#[derive(Debug, Default)]
pub struct LogStore {
    lines: Mutex<Vec<String>>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!("{}", message);

        let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        self.lines.lock().push(format!("[{}] {}", timestamp, message));
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Count lines whose message part contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .iter()
            .filter(|line| message_of(line).contains(needle))
            .count()
    }

    /// Write every line, newline separated, to `path`.
    pub fn export(&self, path: &Path) -> Result<()> {
        let joined = self.lines.lock().join("\n");
        std::fs::write(path, joined)?;
        Ok(())
    }
}

/// Strip the bracketed timestamp from a log line.
pub fn message_of(line: &str) -> &str {
    line.split_once("] ").map(|(_, rest)| rest).unwrap_or(line)
}
