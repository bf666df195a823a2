use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File whose presence identifies a Drupal core installation.
pub const MARKER_FILE: &str = "system.module";

/// Path segments between the root and the marker:
/// `<root>/modules/system/system.module`.
pub const MARKER_DEPTH: usize = 3;

/// Finds a marker file below a directory.
pub trait MarkerScanner: Send + Sync {
    fn find_marker(&self, dir: &Path) -> Option<PathBuf>;
}

/// Scanner walking the tree top-down. Files of a directory are checked
/// before any of its subdirectories, both in name order.
#[derive(Debug, Clone)]
pub struct WalkdirScanner {
    marker: String,
}

impl WalkdirScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Default for WalkdirScanner {
    fn default() -> Self {
        Self::new(MARKER_FILE)
    }
}

impl MarkerScanner for WalkdirScanner {
    fn find_marker(&self, dir: &Path) -> Option<PathBuf> {
        WalkDir::new(dir)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| entry.file_type().is_file() && entry.file_name() == self.marker.as_str())
            .map(|entry| entry.into_path())
    }
}

/// Strip the marker file and the `modules/system` directories above it.
/// Returns `None` when the match sits too close to the filesystem root.
pub fn root_from_marker(marker: &Path) -> Option<PathBuf> {
    marker
        .ancestors()
        .nth(MARKER_DEPTH)
        .filter(|root| !root.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
