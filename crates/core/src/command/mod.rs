//! Drush command lines and the process seam that executes them

pub mod drush_command;
pub mod executor;

// Re-export commonly used types
pub use drush_command::DrushCommand;
pub use executor::{ProcessExecutor, ToolExecutor, ToolOutput};
