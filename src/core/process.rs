use crate::core::error::{ProvisionError, Result};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Run a program with stdout/stderr passed through to the terminal.
    /// The invoked tool prints its own diagnostics; callers only get the
    /// exit status back.
    pub async fn run_streamed(program: &Path, args: &[&str]) -> Result<ExitStatus> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                ProvisionError::CommandFailed(format!("{}: {}", program.display(), e))
            })?;

        Ok(status)
    }

    /// Locate a command on PATH, returning its full path if found.
    pub fn find_in_path(cmd: &str) -> Option<PathBuf> {
        let output = std::process::Command::new("which").arg(cmd).output().ok()?;

        if !output.status.success() {
            return None;
        }

        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}
