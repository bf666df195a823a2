//! Test doubles for the process, scanner and display seams

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    command::{DrushCommand, ToolExecutor, ToolOutput},
    display::ResultDisplay,
    error::{Error, Result},
    root::{MarkerScanner, WalkdirScanner},
};

struct Rule {
    needles: Vec<String>,
    output: ToolOutput,
}

/// Executor answering from canned outputs. A rule matches when every one of
/// its needles appears among the command's arguments; the first matching
/// rule wins. Unmatched commands exit 1 with no output, or fail to launch
/// when the executor is `unlaunchable`.
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Vec<Rule>,
    unlaunchable: bool,
    calls: Mutex<Vec<DrushCommand>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<I, S>(mut self, needles: I, output: ToolOutput) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.push(Rule {
            needles: needles.into_iter().map(Into::into).collect(),
            output,
        });
        self
    }

    pub fn unlaunchable(mut self) -> Self {
        self.unlaunchable = true;
        self
    }

    /// Every command executed so far, in order.
    pub fn calls(&self) -> Vec<DrushCommand> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl ToolExecutor for ScriptedExecutor {
    fn execute(&self, command: &DrushCommand) -> Result<ToolOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }

        let matched = self.rules.iter().find(|rule| {
            rule.needles
                .iter()
                .all(|needle| command.args.iter().any(|arg| arg == needle))
        });

        match matched {
            Some(rule) => Ok(rule.output.clone()),
            None if self.unlaunchable => Err(Error::ToolLaunchError {
                program: command.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted launch failure"),
            }),
            None => Ok(ToolOutput::failure(1, "")),
        }
    }
}

/// Scanner that counts how often it is asked. By default it never finds
/// anything; `delegating` forwards to the real walkdir scanner.
#[derive(Default)]
pub struct CountingScanner {
    calls: AtomicUsize,
    inner: Option<WalkdirScanner>,
}

impl CountingScanner {
    pub fn delegating() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: Some(WalkdirScanner::default()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarkerScanner for CountingScanner {
    fn find_marker(&self, dir: &Path) -> Option<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.as_ref().and_then(|scanner| scanner.find_marker(dir))
    }
}

/// One call to a display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub panel: String,
    pub syntax: String,
    pub text: String,
}

/// Display that keeps everything it is asked to render.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    rendered: Mutex<Vec<Rendered>>,
}

impl RecordingDisplay {
    pub fn rendered(&self) -> Vec<Rendered> {
        self.rendered.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ResultDisplay for RecordingDisplay {
    fn render(&self, panel: &str, syntax: &str, text: &str) {
        if let Ok(mut rendered) = self.rendered.lock() {
            rendered.push(Rendered {
                panel: panel.to_string(),
                syntax: syntax.to_string(),
                text: text.to_string(),
            });
        }
    }
}
