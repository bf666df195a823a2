use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Logical root used when no Drupal installation can be found. It doubles
/// as the name of the fallback cache bin.
pub const FALLBACK_ROOT: &str = "drush";

/// How a project root was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootSource {
    /// Loaded from the on-disk cache
    Cached,
    /// Derived from a marker file found under the working directory
    Scanned,
    /// Reported by `drush dd`
    ToolReported,
    /// Nothing found; the logical fallback name
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoot {
    pub path: PathBuf,
    pub source: RootSource,
}

impl ProjectRoot {
    pub fn new(path: impl Into<PathBuf>, source: RootSource) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_ROOT, RootSource::Fallback)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RootSource::Fallback
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the cache bin keyed by this root.
    pub fn bin_name(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn to_flag(&self) -> String {
        format!("--root={}", self.path.display())
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}
