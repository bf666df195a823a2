use crate::{
    config::Config,
    error::{Error, Result},
};
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha224};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const CACHE_DIR_NAME: &str = "sublime-drush";

static WRITE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hash a logical bin name into its on-disk directory name.
pub fn bin_key(name: &str) -> String {
    hex::encode(Sha224::digest(name.as_bytes()))
}

/// On-disk key/value store. Each bin is a directory named after the hash of
/// its logical name; each entry inside a bin is one JSON file whose
/// modification time is its write timestamp.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(resolve_cache_root(config.cache_dir.as_deref()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for the bin `name`, created if absent.
    pub fn bin_path(&self, name: &str) -> Result<PathBuf> {
        let bin = self.root.join(bin_key(name));
        if bin.is_dir() {
            debug!("Returning cache bin for \"{}\"", name);
        } else {
            std::fs::create_dir_all(&bin).map_err(|e| Error::cache(&bin, e))?;
            debug!("Created new cache bin {} for \"{}\"", bin.display(), name);
        }
        Ok(bin)
    }

    pub fn read<T: DeserializeOwned>(&self, entry: &Path, max_age: Duration) -> Result<Option<T>> {
        self.read_at(entry, max_age, SystemTime::now())
    }

    /// Read `entry` as of `now`. The value is returned only while its age is
    /// strictly below `max_age`; stale entries are left in place.
    pub fn read_at<T: DeserializeOwned>(
        &self,
        entry: &Path,
        max_age: Duration,
        now: SystemTime,
    ) -> Result<Option<T>> {
        let metadata = match std::fs::metadata(entry) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Cache entry {} not found", entry.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::cache(entry, e)),
        };

        let written_at = metadata.modified().map_err(|e| Error::cache(entry, e))?;
        // A timestamp in the future counts as freshly written
        let age = now.duration_since(written_at).unwrap_or(Duration::ZERO);
        if age >= max_age {
            debug!(
                "Cache entry {} expired ({}s old, limit {}s)",
                entry.display(),
                age.as_secs(),
                max_age.as_secs()
            );
            return Ok(None);
        }

        let contents = std::fs::read(entry).map_err(|e| Error::cache(entry, e))?;
        match serde_json::from_slice(&contents) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring undecodable cache entry {}: {}", entry.display(), e);
                Ok(None)
            }
        }
    }

    /// Overwrite `entry` with `value`. The payload goes to a sibling file
    /// first and is renamed into place, so readers never see half a write.
    pub fn write<T: Serialize + ?Sized>(&self, entry: &Path, value: &T) -> Result<()> {
        let parent = entry.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(parent).map_err(|e| Error::cache(parent, e))?;

        let contents = serde_json::to_vec(value)?;
        let file_name = entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "entry".to_string());
        let staging = parent.join(format!(
            ".{}.{}.{}.tmp",
            file_name,
            std::process::id(),
            WRITE_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        std::fs::write(&staging, contents).map_err(|e| Error::cache(&staging, e))?;
        std::fs::rename(&staging, entry).map_err(|e| {
            let _ = std::fs::remove_file(&staging);
            Error::cache(entry, e)
        })?;
        debug!("Wrote cache entry {}", entry.display());
        Ok(())
    }
}

fn resolve_cache_root(configured: Option<&Path>) -> PathBuf {
    // Resolution order: explicit config (env override already applied),
    // platform cache dir, temp dir
    if let Some(dir) = configured.filter(|p| !p.as_os_str().is_empty()) {
        return dir.to_path_buf();
    }
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CACHE_DIR_NAME)
}
