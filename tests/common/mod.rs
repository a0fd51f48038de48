//! Test fixture utilities for integration tests.

// Allow dead code since this is a shared test utility
#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary data directory.
///
/// The directory is cleaned up automatically on drop.
pub struct TestEnv {
    _temp_dir: TempDir,
    data_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let data_dir = temp_dir.path().join("data");
        Self {
            _temp_dir: temp_dir,
            data_dir,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn notes_dir(&self) -> PathBuf {
        self.data_dir.join("notes")
    }

    pub fn tags_file(&self) -> PathBuf {
        self.data_dir.join("tags").join("tags.json")
    }

    pub fn reminders_file(&self) -> PathBuf {
        self.data_dir.join("reminders").join("reminders.json")
    }

    /// Creates a NookCommand configured for this test environment.
    pub fn cmd(&self) -> NookCommand {
        NookCommand::new().dir(&self.data_dir)
    }

    /// Creates a note through the CLI and returns its full ID.
    pub fn create_note(&self, title: &str, content: &str) -> String {
        let stdout = self
            .cmd()
            .args(["new", title, "--content", content])
            .output_success();
        parse_created_id(&stdout)
    }

    /// Creates a task-list note through the CLI and returns its full ID.
    pub fn create_task_list(&self, title: &str, tasks: &[&str]) -> String {
        let mut cmd = self.cmd().args(["new", title]);
        for task in tasks {
            cmd = cmd.args(["--task", task]);
        }
        parse_created_id(&cmd.output_success())
    }

    /// Adds a reminder through the CLI and returns its full ID.
    pub fn create_reminder(&self, note: &str, at: &str) -> String {
        let stdout = self.cmd().args(["remind", "add", note, at]).output_success();
        parse_created_id(&stdout)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts the ID from "Created note <id>..." / "Created reminder <id>" output.
fn parse_created_id(stdout: &str) -> String {
    stdout
        .split_whitespace()
        .nth(2)
        .map(|id| id.trim_end_matches(':').to_string())
        .unwrap_or_else(|| panic!("no id in output: {stdout}"))
}

/// Fluent wrapper around `assert_cmd::Command` for the `nook` binary.
pub struct NookCommand {
    args: Vec<String>,
}

impl NookCommand {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Sets the `--dir` option to specify the data directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Runs the command and returns an Assert for making assertions.
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("nook").expect("Failed to find nook binary");
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for NookCommand {
    fn default() -> Self {
        Self::new()
    }
}
