//! In-memory [`CommandRunner`] for unit tests.

use crate::error::Diagnostic;
use crate::process::{render_command, CommandRunner};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn line(&self) -> String {
        self.args.join(" ")
    }
}

enum Action {
    Respond(String),
    Fail(String),
    Hold(Arc<Notify>),
}

struct Rule {
    prefix: String,
    action: Action,
}

/// Records every call and answers from rules matched by argument prefix.
///
/// Later rules win. Unmatched calls succeed with empty stdout, which also
/// makes `status --porcelain` report a clean tree.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<Invocation>>,
    rules: Mutex<Vec<Rule>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, prefix: &str, stdout: &str) {
        self.rules.lock().push(Rule {
            prefix: prefix.to_string(),
            action: Action::Respond(stdout.to_string()),
        });
    }

    pub fn fail(&self, prefix: &str, message: &str) {
        self.rules.lock().push(Rule {
            prefix: prefix.to_string(),
            action: Action::Fail(message.to_string()),
        });
    }

    /// Block matching calls until the returned handle is notified.
    pub fn hold(&self, prefix: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.rules.lock().push(Rule {
            prefix: prefix.to_string(),
            action: Action::Hold(notify.clone()),
        });
        notify
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().iter().map(Invocation::line).collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.line().starts_with(prefix))
            .count()
    }

    fn lookup(&self, line: &str) -> Option<Result<String, String>> {
        let rules = self.rules.lock();
        rules
            .iter()
            .rev()
            .filter(|r| !matches!(r.action, Action::Hold(_)))
            .find(|r| line.starts_with(&r.prefix))
            .map(|r| match &r.action {
                Action::Respond(out) => Ok(out.clone()),
                Action::Fail(msg) => Err(msg.clone()),
                Action::Hold(_) => Ok(String::new()),
            })
    }

    fn gate(&self, line: &str) -> Option<Arc<Notify>> {
        let rules = self.rules.lock();
        rules.iter().rev().find_map(|r| match &r.action {
            Action::Hold(n) if line.starts_with(&r.prefix) => Some(n.clone()),
            _ => None,
        })
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> std::result::Result<String, Diagnostic> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            working_dir: working_dir.map(Path::to_path_buf),
        };
        let line = invocation.line();
        self.calls.lock().push(invocation);

        if let Some(gate) = self.gate(&line) {
            gate.notified().await;
        }

        match self.lookup(&line) {
            Some(Err(message)) => Err(Diagnostic::exited(
                render_command(program, args),
                Some(1),
                message,
            )),
            Some(Ok(out)) => Ok(out),
            None => Ok(String::new()),
        }
    }
}
