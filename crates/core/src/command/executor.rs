use std::process::{Command, Stdio};

use tracing::debug;

use super::DrushCommand;
use crate::error::{Error, Result};

/// Captured result of one finished drush process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stdout: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        let mut text = String::with_capacity(self.stdout.len() + self.stderr.len());
        text.push_str(&self.stdout);
        text.push_str(&self.stderr);
        text
    }
}

/// Runs drush command lines to completion.
pub trait ToolExecutor: Send + Sync {
    /// Run `command` and capture all of its output. Only a failure to launch
    /// the process is an error; a non-zero exit is reported in the output.
    fn execute(&self, command: &DrushCommand) -> Result<ToolOutput>;
}

/// Executor backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ToolExecutor for ProcessExecutor {
    fn execute(&self, command: &DrushCommand) -> Result<ToolOutput> {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = command.working_dir {
            cmd.current_dir(dir);
        }

        debug!("Spawning: {}", command.to_shell_command());
        let output = cmd.output().map_err(|source| Error::ToolLaunchError {
            program: command.program.clone(),
            source,
        })?;

        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
