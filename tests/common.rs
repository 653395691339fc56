use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use gittycat::SystemRunner;
use tempfile::TempDir;

/// Get the path to the gittycat binary for testing.
#[allow(dead_code)]
pub fn get_gittycat_path() -> PathBuf {
    assert_cmd::cargo::cargo_bin!("gittycat").to_path_buf()
}

/// Isolated workspace: a config dir, a bare remote and room for local
/// folders. Git identity and config are pinned through the environment so
/// the user's global git settings never leak in.
/// Used by various test files - #[allow(dead_code)] because not all tests use all fields.
#[allow(dead_code)]
pub struct TestWorkspace {
    pub temp_dir: TempDir,
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
    pub remote_path: PathBuf,
    pub git_config: PathBuf,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        let git_config = temp_dir.path().join("gitconfig");
        fs::write(&git_config, "").expect("Failed to write gitconfig");

        let workspace = Self {
            config_path: config_dir.join("config.json"),
            config_dir,
            remote_path: temp_dir.path().join("remote.git"),
            git_config,
            temp_dir,
        };
        workspace.init_bare_remote();
        workspace
    }

    fn init_bare_remote(&self) {
        let status = self
            .git_command(self.temp_dir.path())
            .args(["init", "--bare", "--quiet"])
            .arg(&self.remote_path)
            .status()
            .expect("Failed to run git init --bare");
        assert!(status.success(), "git init --bare failed");
    }

    /// Path for a local folder inside the workspace. Not created.
    pub fn folder(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join("folders").join(name)
    }

    pub fn remote_url(&self) -> String {
        self.remote_path.to_string_lossy().to_string()
    }

    pub fn git_env(&self) -> Vec<(String, String)> {
        vec![
            ("GIT_AUTHOR_NAME".into(), "GittyCat Test".into()),
            ("GIT_AUTHOR_EMAIL".into(), "test@example.com".into()),
            ("GIT_COMMITTER_NAME".into(), "GittyCat Test".into()),
            ("GIT_COMMITTER_EMAIL".into(), "test@example.com".into()),
            ("GIT_CONFIG_NOSYSTEM".into(), "1".into()),
            (
                "GIT_CONFIG_GLOBAL".into(),
                self.git_config.to_string_lossy().to_string(),
            ),
            ("GIT_TERMINAL_PROMPT".into(), "0".into()),
        ]
    }

    pub fn runner(&self) -> SystemRunner {
        self.git_env()
            .into_iter()
            .fold(SystemRunner::new(), |runner, (k, v)| runner.with_env(k, v))
    }

    pub fn git_command(&self, dir: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir);
        for (k, v) in self.git_env() {
            cmd.env(k, v);
        }
        cmd
    }

    /// A gittycat invocation bound to this workspace's config dir.
    pub fn gittycat(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::new(get_gittycat_path());
        cmd.env("GITTYCAT_CONFIG_DIR", &self.config_dir);
        cmd.env("GITTYCAT_LOG", "warn");
        for (k, v) in self.git_env() {
            cmd.env(k, v);
        }
        cmd
    }

    /// Number of commits on `branch` in the bare remote, 0 if it does not exist.
    pub fn remote_commit_count(&self, branch: &str) -> usize {
        let output = self
            .git_command(&self.remote_path)
            .args(["rev-list", "--count", branch])
            .output()
            .expect("Failed to run git rev-list");
        if !output.status.success() {
            return 0;
        }
        String::from_utf8_lossy(&output.stdout)
            .trim()
            .parse()
            .unwrap_or(0)
    }

    pub fn porcelain(&self, dir: &Path) -> String {
        let output = self
            .git_command(dir)
            .args(["status", "--porcelain"])
            .output()
            .expect("Failed to run git status");
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn remote_has_file(&self, branch: &str, file: &str) -> bool {
        self.git_command(&self.remote_path)
            .args(["cat-file", "-e", &format!("{}:{}", branch, file)])
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}
