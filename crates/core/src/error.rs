use std::io;
use std::path::PathBuf;

/// Errors that can occur during subdrush operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Cache error at {path}: {source}")]
    CacheError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to launch drush at '{program}': {source}")]
    ToolLaunchError {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Drush does not report a command named '{0}'")]
    UnknownCommand(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Background task '{0}' panicked")]
    DispatchError(String),
}

impl Error {
    pub fn cache(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::CacheError {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for subdrush operations
pub type Result<T> = std::result::Result<T, Error>;
