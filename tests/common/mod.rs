//! Common test utilities for jamparse integration tests
//!
//! This module provides shared test infrastructure including:
//! - CLI invocation helpers for the demonstration binary
//! - Log file access for the `default` and `warnings` channels
//! - In-memory writers for in-process guard tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// ANSI color escape sequence prefix
pub const COLOR: &str = "\x1b[";

/// Program name of the demonstration binary
pub const PROG: &str = "jamparse";

/// Exit status codes matching the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    Usage = 2,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            2 => ExitStatus::Usage,
            _ => ExitStatus::Error,
        }
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit status code
    pub exit_status: ExitStatus,
    /// Raw exit code
    pub exit_code: i32,
    /// Working directory of the run; log files land here without --out-dir
    pub workdir: PathBuf,
}

impl CliResponse {
    /// Contents of `<dir>/jamparse.log`, empty if missing
    pub fn log_in(&self, dir: &Path) -> String {
        read_or_empty(&dir.join(format!("{}.log", PROG)))
    }

    /// Contents of `<dir>/warnings.log`, empty if missing
    pub fn warnings_in(&self, dir: &Path) -> String {
        read_or_empty(&dir.join("warnings.log"))
    }

    /// Default channel log in the working directory
    pub fn log(&self) -> String {
        self.log_in(&self.workdir)
    }

    /// Warnings channel log in the working directory
    pub fn warnings(&self) -> String {
        self.warnings_in(&self.workdir)
    }
}

/// Sandbox for one CLI run
pub struct MockEnvironment {
    /// Working directory of the child process
    pub workdir: TempDir,
    /// Environment variables to set
    pub env_vars: HashMap<String, String>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    /// Create a new mock environment with colours disabled
    pub fn new() -> Self {
        let workdir = TempDir::new().expect("Failed to create temp workdir");
        let mut env_vars = HashMap::new();
        env_vars.insert("JAM_COLOR".to_string(), "never".to_string());
        Self { workdir, env_vars }
    }

    /// Set an environment variable
    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Get the working directory path
    pub fn path(&self) -> PathBuf {
        self.workdir.path().to_path_buf()
    }
}

/// Run the CLI with the given arguments
///
/// # Arguments
/// * `args` - Command line arguments (excluding the program name)
///
/// # Returns
/// A `CliResponse` with stdout, stderr, and exit status
pub fn jam(args: &[&str], env: &MockEnvironment) -> CliResponse {
    let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();
    jam_os(&args, env)
}

/// Run the CLI with arguments that need not be valid UTF-8
pub fn jam_os(args: &[&OsStr], env: &MockEnvironment) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_jamparse"));
    cmd.args(args);
    cmd.current_dir(env.path());

    cmd.env_remove("NO_COLOR");
    cmd.env_remove("JAM_LOG");
    for (key, value) in &env.env_vars {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to execute command");
    parse_output(output, env.path())
}

fn parse_output(output: Output, workdir: PathBuf) -> CliResponse {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(1);

    CliResponse {
        stdout,
        stderr,
        exit_status: ExitStatus::from(exit_code),
        exit_code,
        workdir,
    }
}

fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

/// Create a temporary file with the given content
pub fn create_temp_file(content: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = dir.path().join("numbers.txt");
    std::fs::write(&file_path, content).expect("Failed to write temp file");
    (dir, file_path)
}

/// Clonable in-memory writer for capturing guard output in-process
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_from_i32() {
        assert_eq!(ExitStatus::from(0), ExitStatus::Success);
        assert_eq!(ExitStatus::from(1), ExitStatus::Error);
        assert_eq!(ExitStatus::from(2), ExitStatus::Usage);
        assert_eq!(ExitStatus::from(130), ExitStatus::Error);
    }

    #[test]
    fn test_shared_buffer() {
        let buf = SharedBuffer::new();
        let mut writer = buf.clone();
        write!(writer, "hello").unwrap();
        assert_eq!(buf.contents(), "hello");
    }
}
