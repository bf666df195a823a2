//! Runs drush commands in backend mode and normalizes what comes back

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    backend::{ParseMode, parse_backend_output},
    command::{DrushCommand, ToolExecutor},
    display::{ERROR_PANEL, ERROR_SYNTAX, ResultDisplay},
    error::Result,
    types::{Invocation, ProjectRoot},
};

/// Shown when drush succeeded but printed nothing usable.
pub const NO_OUTPUT_MESSAGE: &str = "Failed to get output!";

/// Result of one backend run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Text to show the user
    Output(String),
    /// Drush succeeded without any output
    NoOutput,
    /// Drush failed; the rendered failure block has already been displayed
    Failed(String),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed(_))
    }

    /// The command output, if drush produced any.
    pub fn output(&self) -> Option<&str> {
        match self {
            RunOutcome::Output(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn into_output(self) -> Option<String> {
        match self {
            RunOutcome::Output(text) => Some(text),
            _ => None,
        }
    }

    /// What to show the user for this outcome.
    pub fn display_text(&self) -> &str {
        match self {
            RunOutcome::Output(text) | RunOutcome::Failed(text) => text.as_str(),
            RunOutcome::NoOutput => NO_OUTPUT_MESSAGE,
        }
    }
}

pub struct CommandRunner {
    drush_path: String,
    executor: Arc<dyn ToolExecutor>,
    display: Arc<dyn ResultDisplay>,
}

impl CommandRunner {
    pub fn new(
        drush_path: impl Into<String>,
        executor: Arc<dyn ToolExecutor>,
        display: Arc<dyn ResultDisplay>,
    ) -> Self {
        Self {
            drush_path: drush_path.into(),
            executor,
            display,
        }
    }

    pub fn build_command(&self, root: &ProjectRoot, invocation: &Invocation) -> DrushCommand {
        DrushCommand::backend(&self.drush_path, root, invocation)
    }

    /// Run `invocation` against `root`. A failing drush command is shown on
    /// the display and reported as [`RunOutcome::Failed`]; only a drush that
    /// cannot be launched at all is an error.
    pub fn run(&self, root: &ProjectRoot, invocation: &Invocation) -> Result<RunOutcome> {
        let command = self.build_command(root, invocation);
        let command_line = command.to_command_line();
        info!("Call to Drush: {}", command_line);

        let output = self.executor.execute(&command)?;

        if output.is_success() {
            let data = parse_backend_output(&output.combined(), ParseMode::Normal);
            if !data.message_raw.is_empty() {
                return Ok(RunOutcome::Output(data.message_raw));
            }
            return Ok(match data.first_output() {
                Some(text) if !text.is_empty() => RunOutcome::Output(text.to_string()),
                _ => {
                    warn!("Failed to get output from: {}", command_line);
                    RunOutcome::NoOutput
                }
            });
        }

        let data = parse_backend_output(&output.combined(), ParseMode::Error);
        let body = match data.first_error_log() {
            Some(error_log) => render_error_log(error_log),
            None => data.message_raw.trim_end().to_string(),
        };
        warn!(
            "Error returned from Drush (exit {:?}): {}",
            output.status, body
        );

        let report = failure_report(&command_line, &body);
        self.display.render(ERROR_PANEL, ERROR_SYNTAX, &report);
        Ok(RunOutcome::Failed(report))
    }
}

/// One `FIELD: "first message"` line per error_log entry.
pub fn render_error_log(error_log: &Map<String, Value>) -> String {
    error_log
        .iter()
        .map(|(field, messages)| {
            let first = match messages {
                Value::Array(items) => items.first(),
                other => Some(other),
            };
            let text = match first {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            format!("{field}: \"{text}\"")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn failure_report(command_line: &str, body: &str) -> String {
    let header = format!("COMMAND_FAILURE: \"{command_line}\"");
    if body.is_empty() {
        header
    } else {
        format!("{header}\n{body}")
    }
}
