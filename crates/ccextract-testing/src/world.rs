//! TestWorld pattern for declarative integration test setup.
//!
//! Lays out a fake `~/.claude/projects` tree inside a temp dir and runs the
//! `ccextract` binary against it with an isolated config, output dir and home.

use anyhow::Result;
use assert_cmd::Command;
use filetime::FileTime;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use ccextract_testing::{TestWorld, fixtures};
///
/// let world = TestWorld::new().with_session(
///     "-Users-alice-app",
///     "abcd1234-0000",
///     &fixtures::simple_session("2026-01-15T10:00:00Z", "Hi", "Hello"),
/// );
///
/// let result = world.run(&["list"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    claude_dir: PathBuf,
    output_dir: PathBuf,
    config_path: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_path = temp_dir.path().to_path_buf();
        let claude_dir = base_path.join(".claude").join("projects");
        let output_dir = base_path.join("out");
        let config_path = base_path.join("config.toml");

        std::fs::create_dir_all(&claude_dir).expect("Failed to create projects dir");

        Self {
            temp_dir,
            claude_dir,
            output_dir,
            config_path,
            env_vars: HashMap::new(),
        }
    }

    /// The fake `~/.claude/projects`.
    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir
    }

    /// Default `--output` target used by [`TestWorld::export`].
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a main transcript, whether or not it exists yet.
    pub fn session_path(&self, project_dir: &str, session_id: &str) -> PathBuf {
        self.claude_dir
            .join(project_dir)
            .join(format!("{}.jsonl", session_id))
    }

    /// Write a main transcript under an encoded project directory such as
    /// `-Users-alice-app`.
    pub fn with_session(self, project_dir: &str, session_id: &str, lines: &[String]) -> Self {
        let path = self.session_path(project_dir, session_id);
        write_lines(&path, lines);
        self
    }

    /// Write `{session}/subagents/agent-{agent_id}.jsonl` next to a transcript.
    pub fn with_subagent(
        self,
        project_dir: &str,
        session_id: &str,
        agent_id: &str,
        lines: &[String],
    ) -> Self {
        let path = self
            .claude_dir
            .join(project_dir)
            .join(session_id)
            .join("subagents")
            .join(format!("agent-{}.jsonl", agent_id));
        write_lines(&path, lines);
        self
    }

    /// Set a transcript's mtime `seconds_ago` in the past, to order listings.
    pub fn age_session(self, project_dir: &str, session_id: &str, seconds_ago: i64) -> Self {
        let path = self.session_path(project_dir, session_id);
        let now = FileTime::now();
        let then = FileTime::from_unix_time(now.unix_seconds() - seconds_ago, 0);
        filetime::set_file_mtime(&path, then).expect("Failed to set mtime");
        self
    }

    /// Write the config file the binary will load.
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(&self.config_path, toml).expect("Failed to write config");
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config")
            .arg(&self.config_path)
            .arg("--claude-dir")
            .arg(&self.claude_dir);

        cmd.current_dir(self.temp_dir.path())
            .env("HOME", self.temp_dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("CCEXTRACT_CONFIG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the binary with `args` after the global flags.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("ccextract")
            .map_err(|e| anyhow::anyhow!("Failed to find ccextract binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// `export --output <output_dir> <args>`
    pub fn export(&self, args: &[&str]) -> Result<CliResult> {
        let output = self.output_dir.to_string_lossy().into_owned();
        let mut full = vec!["export", "--output", output.as_str()];
        full.extend_from_slice(args);
        self.run(&full)
    }

    /// Every file under the output dir, relative to it, sorted.
    pub fn exported_files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(&self.output_dir)
                    .ok()
                    .map(|rel| rel.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        files.sort();
        files
    }

    pub fn read_export(&self, relative: &str) -> String {
        std::fs::read_to_string(self.output_dir.join(relative))
            .unwrap_or_else(|e| panic!("Failed to read export {}: {}", relative, e))
    }
}

fn write_lines(path: &Path, lines: &[String]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create session dir");
    }
    std::fs::write(path, lines.join("\n")).expect("Failed to write session");
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_files_are_relative_and_sorted() {
        let world = TestWorld::new();
        assert!(world.exported_files().is_empty());

        let nested = world.output_dir().join("_Users_alice_app").join("2026-01-15");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("b.md"), "b").unwrap();
        std::fs::write(world.output_dir().join("a.md"), "a").unwrap();

        assert_eq!(
            world.exported_files(),
            vec!["_Users_alice_app/2026-01-15/b.md", "a.md"]
        );
        assert_eq!(world.read_export("a.md"), "a");
    }
}
