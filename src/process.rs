//! Runs external commands and captures their output.
//!
//! Every invocation is awaited on the tokio runtime, so only the calling task
//! is suspended while the child runs. Output is collected in full; nothing is
//! streamed.

use crate::error::Diagnostic;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Seam between the protocols and the operating system.
///
/// Implementations resolve to the captured stdout on exit code 0 and to a
/// [`Diagnostic`] otherwise, including when the program could not be started.
pub trait CommandRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> impl Future<Output = std::result::Result<String, Diagnostic>> + Send;
}

impl<T: CommandRunner> CommandRunner for std::sync::Arc<T> {
    fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> impl Future<Output = std::result::Result<String, Diagnostic>> + Send {
        (**self).run(program, args, working_dir)
    }
}

/// Spawns real processes through `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    envs: Vec<(String, String)>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an environment variable to every spawned process.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> std::result::Result<String, Diagnostic> {
        let rendered = render_command(program, args);
        tracing::debug!("Running '{}' in {:?}", rendered, working_dir);

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| Diagnostic::spawn_failed(rendered.clone(), &e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let message = if stderr.trim().is_empty() {
            stdout
        } else {
            stderr
        };

        Err(Diagnostic::exited(rendered, output.status.code(), message))
    }
}

pub fn render_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
