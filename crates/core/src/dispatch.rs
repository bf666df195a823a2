//! Background dispatch for user-triggered drush calls
//!
//! Every core call blocks on subprocess I/O. Front ends run one call per
//! user action on its own worker thread so their UI thread never waits on
//! drush. Tasks cannot be cancelled; they run until drush exits.

use std::thread::{self, JoinHandle};

use tracing::{debug, info_span};

use crate::error::{Error, Result};

/// A running background task.
#[derive(Debug)]
pub struct TaskHandle<T> {
    label: String,
    handle: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task. A panic inside the job is reported as an error.
    pub fn join(self) -> Result<T> {
        self.handle
            .join()
            .map_err(|_| Error::DispatchError(self.label))
    }
}

/// Run `job` on a named worker thread.
pub fn spawn<T, F>(label: impl Into<String>, job: F) -> Result<TaskHandle<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let label = label.into();
    let span_label = label.clone();
    let handle = thread::Builder::new()
        .name(format!("subdrush-{label}"))
        .spawn(move || {
            let span = info_span!("task", label = %span_label);
            let _enter = span.enter();
            debug!("Task started");
            let result = job();
            debug!("Task finished");
            result
        })?;

    Ok(TaskHandle { label, handle })
}

/// Run `job` on a worker thread and hand its result to `on_complete` on
/// that same thread.
pub fn spawn_with_callback<T, F, C>(
    label: impl Into<String>,
    job: F,
    on_complete: C,
) -> Result<TaskHandle<()>>
where
    F: FnOnce() -> T + Send + 'static,
    C: FnOnce(T) + Send + 'static,
    T: Send + 'static,
{
    spawn(label, move || on_complete(job()))
}
