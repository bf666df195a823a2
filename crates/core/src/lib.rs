//! subdrush - Drush integration for editors
//!
//! This crate provides functionality to:
//! - Locate the Drupal root for an editor's working directory
//! - Run drush commands in backend mode and decode their mixed text/JSON output
//! - Cache drush discovery results (project root, command metadata, command arguments) on disk
//! - Dispatch blocking drush calls onto background workers
pub mod aliases;
pub mod backend;
pub mod cache;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod error;
pub mod metadata;
pub mod root;
pub mod runner;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;
pub mod version;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use backend::{BackendResult, ParseMode, parse_backend_output};
pub use cache::CacheStore;
pub use command::{DrushCommand, ProcessExecutor, ToolExecutor, ToolOutput};
pub use config::Config;
pub use display::{LogDisplay, ResultDisplay};
pub use metadata::MetadataCache;
pub use root::{MarkerScanner, RootLocator};
pub use runner::{CommandRunner, RunOutcome};
pub use session::{DrushApi, SessionBuilder};
