//! Project root discovery
//!
//! A root is resolved once per locator and then kept in memory. Resolution
//! tries, in order: the on-disk cache for the working directory, a marker
//! file scan of the working directory, `drush dd`, and finally the logical
//! `drush` fallback. A root found by any method is trusted for the whole
//! cache window without being validated again.

pub mod scanner;

pub use scanner::{MARKER_DEPTH, MARKER_FILE, MarkerScanner, WalkdirScanner, root_from_marker};

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    cache::CacheStore,
    command::{DrushCommand, ToolExecutor},
    config::DEFAULT_ROOT_TTL_SECS,
    error::Result,
    types::{FALLBACK_ROOT, ProjectRoot, RootSource},
};

/// Entry name of the persisted root inside a working-directory bin.
pub const ROOT_CACHE_ENTRY: &str = "drupal_root";

pub struct RootLocator {
    working_dir: Option<PathBuf>,
    store: CacheStore,
    executor: Arc<dyn ToolExecutor>,
    scanner: Arc<dyn MarkerScanner>,
    drush_path: String,
    max_age: Duration,
    resolved: OnceLock<ProjectRoot>,
}

impl RootLocator {
    pub fn new(
        working_dir: Option<PathBuf>,
        store: CacheStore,
        executor: Arc<dyn ToolExecutor>,
        drush_path: impl Into<String>,
    ) -> Self {
        Self {
            working_dir,
            store,
            executor,
            scanner: Arc::new(WalkdirScanner::default()),
            drush_path: drush_path.into(),
            max_age: Duration::from_secs(DEFAULT_ROOT_TTL_SECS),
            resolved: OnceLock::new(),
        }
    }

    pub fn with_scanner(mut self, scanner: Arc<dyn MarkerScanner>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// The project root, resolved on first call and memoized afterwards.
    pub fn project_root(&self) -> Result<ProjectRoot> {
        if let Some(root) = self.resolved.get() {
            return Ok(root.clone());
        }
        let root = self.resolve()?;
        Ok(self.resolved.get_or_init(|| root).clone())
    }

    fn resolve(&self) -> Result<ProjectRoot> {
        let Some(working_dir) = self.working_dir.as_deref() else {
            warn!("Working directory is not set, using \"{}\"", FALLBACK_ROOT);
            return Ok(ProjectRoot::fallback());
        };

        let entry = self.root_entry(working_dir)?;

        if let Some(path) = self.from_disk_cache(&entry)? {
            info!("Loaded Drupal root from cache: {}", path.display());
            return Ok(ProjectRoot::new(path, RootSource::Cached));
        }

        debug!("Searching for Drupal root in {}", working_dir.display());
        if let Some(path) = self.scanner.find_marker(working_dir).as_deref().and_then(root_from_marker) {
            info!("Saving Drupal root \"{}\" in cache", path.display());
            self.store.write(&entry, &path)?;
            return Ok(ProjectRoot::new(path, RootSource::Scanned));
        }

        if let Some(path) = self.from_drush(working_dir) {
            info!("`drush dd` found a directory: {}", path.display());
            self.store.write(&entry, &path)?;
            return Ok(ProjectRoot::new(path, RootSource::ToolReported));
        }

        warn!(
            "No Drupal root found under {}, using \"{}\" cache bin",
            working_dir.display(),
            FALLBACK_ROOT
        );
        self.store.bin_path(FALLBACK_ROOT)?;
        Ok(ProjectRoot::fallback())
    }

    fn root_entry(&self, working_dir: &Path) -> Result<PathBuf> {
        let bin = self.store.bin_path(&working_dir.to_string_lossy())?;
        Ok(bin.join(ROOT_CACHE_ENTRY))
    }

    fn from_disk_cache(&self, entry: &Path) -> Result<Option<PathBuf>> {
        let cached: Option<PathBuf> = self.store.read(entry, self.max_age)?;
        match cached {
            Some(path) if path.is_dir() => Ok(Some(path)),
            Some(path) => {
                debug!("Cached root {} is no longer a directory", path.display());
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn from_drush(&self, working_dir: &Path) -> Option<PathBuf> {
        let command =
            DrushCommand::new(&self.drush_path, ["dd", "--nocolor"]).with_working_dir(working_dir);
        match self.executor.execute(&command) {
            Ok(output) => {
                let reported = output.stdout.trim();
                let path = PathBuf::from(reported);
                (!reported.is_empty() && path.is_dir()).then_some(path)
            }
            Err(e) => {
                warn!("Could not ask drush for the root: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for RootLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootLocator")
            .field("working_dir", &self.working_dir)
            .field("drush_path", &self.drush_path)
            .field("max_age", &self.max_age)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ToolOutput;
    use crate::testing::{CountingScanner, ScriptedExecutor};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        workspace: PathBuf,
        store: CacheStore,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let workspace = temp.path().join("workspace");
        fs::create_dir_all(&workspace).unwrap();
        let store = CacheStore::new(temp.path().join("cache"));
        Fixture {
            _temp: temp,
            workspace,
            store,
        }
    }

    fn install_drupal(dir: &Path) -> PathBuf {
        let root = dir.join("docroot");
        let system = root.join("modules/system");
        fs::create_dir_all(&system).unwrap();
        fs::write(system.join("system.module"), "<?php").unwrap();
        root
    }

    fn locator(fx: &Fixture, executor: Arc<ScriptedExecutor>) -> RootLocator {
        RootLocator::new(
            Some(fx.workspace.clone()),
            fx.store.clone(),
            executor,
            "/usr/local/bin/drush",
        )
    }

    #[test]
    fn test_scan_finds_root_and_persists_it() -> Result<()> {
        let fx = fixture();
        let docroot = install_drupal(&fx.workspace);
        let executor = Arc::new(ScriptedExecutor::new());

        let root = locator(&fx, executor.clone()).project_root()?;
        assert_eq!(root, ProjectRoot::new(&docroot, RootSource::Scanned));
        assert!(executor.calls().is_empty());

        // A fresh session now picks it up from disk
        let root = locator(&fx, executor).project_root()?;
        assert_eq!(root, ProjectRoot::new(&docroot, RootSource::Cached));
        Ok(())
    }

    #[test]
    fn test_disk_cache_wins_over_scan() -> Result<()> {
        let fx = fixture();
        install_drupal(&fx.workspace);
        let cached_root = fx.workspace.join("elsewhere");
        fs::create_dir_all(&cached_root)?;

        let entry = fx
            .store
            .bin_path(&fx.workspace.to_string_lossy())?
            .join(ROOT_CACHE_ENTRY);
        fx.store.write(&entry, &cached_root)?;

        let scanner = Arc::new(CountingScanner::default());
        let root = locator(&fx, Arc::new(ScriptedExecutor::new()))
            .with_scanner(scanner.clone())
            .project_root()?;

        assert_eq!(root, ProjectRoot::new(&cached_root, RootSource::Cached));
        assert_eq!(scanner.calls(), 0);
        Ok(())
    }

    #[test]
    fn test_stale_or_missing_cached_root_is_ignored() -> Result<()> {
        let fx = fixture();
        let docroot = install_drupal(&fx.workspace);
        let entry = fx
            .store
            .bin_path(&fx.workspace.to_string_lossy())?
            .join(ROOT_CACHE_ENTRY);
        fx.store.write(&entry, &fx.workspace.join("deleted-site"))?;

        let scanner = Arc::new(CountingScanner::delegating());
        let root = locator(&fx, Arc::new(ScriptedExecutor::new()))
            .with_scanner(scanner.clone())
            .project_root()?;
        assert_eq!(root, ProjectRoot::new(&docroot, RootSource::Scanned));
        assert_eq!(scanner.calls(), 1);

        // An expired entry is skipped as well
        let scanner = Arc::new(CountingScanner::delegating());
        let root = locator(&fx, Arc::new(ScriptedExecutor::new()))
            .with_scanner(scanner.clone())
            .with_max_age(Duration::ZERO)
            .project_root()?;
        assert_eq!(root.source, RootSource::Scanned);
        assert_eq!(scanner.calls(), 1);
        Ok(())
    }

    #[test]
    fn test_falls_back_to_drush_dd() -> Result<()> {
        let fx = fixture();
        let reported = fx.workspace.join("reported");
        fs::create_dir_all(&reported)?;
        let executor = Arc::new(
            ScriptedExecutor::new().on(["dd"], ToolOutput::success(format!("{}\n", reported.display()))),
        );

        let root = locator(&fx, executor.clone()).project_root()?;
        assert_eq!(root, ProjectRoot::new(&reported, RootSource::ToolReported));

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["dd", "--nocolor"]);
        assert_eq!(calls[0].working_dir.as_deref(), Some(fx.workspace.as_path()));
        Ok(())
    }

    #[test]
    fn test_defaults_to_fallback_bin() -> Result<()> {
        let fx = fixture();
        let executor =
            Arc::new(ScriptedExecutor::new().on(["dd"], ToolOutput::success("/no/such/directory\n")));

        let root = locator(&fx, executor).project_root()?;
        assert!(root.is_fallback());
        assert_eq!(root.path(), Path::new("drush"));
        assert!(fx.store.root().join(crate::cache::bin_key("drush")).is_dir());
        Ok(())
    }

    #[test]
    fn test_missing_drush_during_discovery_is_not_fatal() -> Result<()> {
        let fx = fixture();
        let executor = Arc::new(ScriptedExecutor::new().unlaunchable());

        let root = locator(&fx, executor).project_root()?;
        assert!(root.is_fallback());
        Ok(())
    }

    #[test]
    fn test_without_working_dir() -> Result<()> {
        let fx = fixture();
        let executor = Arc::new(ScriptedExecutor::new());
        let locator = RootLocator::new(None, fx.store.clone(), executor.clone(), "drush");

        assert_eq!(locator.project_root()?, ProjectRoot::fallback());
        assert!(executor.calls().is_empty());
        Ok(())
    }

    #[test]
    fn test_root_is_memoized_for_the_session() -> Result<()> {
        let fx = fixture();
        let docroot = install_drupal(&fx.workspace);
        let scanner = Arc::new(CountingScanner::delegating());
        let locator = locator(&fx, Arc::new(ScriptedExecutor::new())).with_scanner(scanner.clone());

        assert_eq!(locator.project_root()?.path(), docroot.as_path());

        // Removing the install does not affect the memoized answer
        fs::remove_dir_all(&docroot)?;
        assert_eq!(locator.project_root()?.path(), docroot.as_path());
        assert_eq!(scanner.calls(), 1);
        Ok(())
    }
}
