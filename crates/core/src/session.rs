//! The editor-facing session object
//!
//! A [`DrushApi`] bundles everything one editor window needs: config, cache
//! store, process executor, display, and the memoized project root. Front
//! ends build one per window and may share it between background tasks.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::{
    aliases,
    cache::CacheStore,
    command::{ProcessExecutor, ToolExecutor},
    config::Config,
    display::{LogDisplay, ResultDisplay},
    error::Result,
    metadata::MetadataCache,
    root::{MarkerScanner, RootLocator},
    runner::{CommandRunner, RunOutcome},
    types::{Invocation, ProjectRoot},
    version,
};

/// Directory to search from: the first open folder, or the directory of the
/// active file when no folder is open.
pub fn working_dir_for(folders: &[PathBuf], active_file: Option<&Path>) -> Option<PathBuf> {
    folders
        .first()
        .cloned()
        .or_else(|| active_file.and_then(Path::parent).map(Path::to_path_buf))
        .filter(|dir| !dir.as_os_str().is_empty())
}

pub struct DrushApi {
    config: Config,
    store: CacheStore,
    executor: Arc<dyn ToolExecutor>,
    locator: RootLocator,
    runner: CommandRunner,
    metadata: MetadataCache,
}

impl DrushApi {
    pub fn builder(config: Config) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Session for `working_dir` using the real drush binary.
    pub fn new(config: Config, working_dir: Option<PathBuf>) -> Self {
        SessionBuilder::new(config).working_dir(working_dir).build()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache_store(&self) -> &CacheStore {
        &self.store
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.locator.working_dir()
    }

    pub fn project_root(&self) -> Result<ProjectRoot> {
        self.locator.project_root()
    }

    /// Run a drush command against the project root.
    pub fn run_command<A, O>(&self, command: &str, args: A, options: O) -> Result<RunOutcome>
    where
        A: IntoIterator,
        A::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        self.run_invocation(&Invocation::new(command, args, options))
    }

    pub fn run_invocation(&self, invocation: &Invocation) -> Result<RunOutcome> {
        let root = self.project_root()?;
        self.runner.run(&root, invocation)
    }

    /// Local alias names, or `None` when drush could not list them.
    pub fn local_site_aliases(&self) -> Result<Option<Vec<String>>> {
        let outcome = self.run_invocation(&aliases::local_aliases_invocation())?;
        Ok(outcome.output().and_then(aliases::local_alias_names))
    }

    /// The alias name of the site installed at `directory`.
    pub fn site_alias_for_root(&self, directory: &Path) -> Result<Option<String>> {
        let outcome = self.run_invocation(&aliases::full_aliases_invocation())?;
        Ok(outcome
            .output()
            .and_then(|output| aliases::alias_for_root(output, directory)))
    }

    pub fn command_info(&self, command: &str) -> Result<Value> {
        let root = self.project_root()?;
        self.metadata.command_metadata(&root, command)
    }

    pub fn command_args(&self, command: &str) -> Result<Vec<String>> {
        let root = self.project_root()?;
        self.metadata.command_args(&root, command)
    }

    pub fn drush_version(&self) -> Result<u32> {
        version::drush_major_version(self.executor.as_ref(), &self.config.drush_path)
    }

    /// Whether the installed drush is recent enough.
    pub fn check_requirements(&self) -> Result<bool> {
        Ok(version::meets_requirements(self.drush_version()?))
    }
}

impl std::fmt::Debug for DrushApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrushApi")
            .field("config", &self.config)
            .field("store", &self.store)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

pub struct SessionBuilder {
    config: Config,
    working_dir: Option<PathBuf>,
    executor: Arc<dyn ToolExecutor>,
    display: Arc<dyn ResultDisplay>,
    scanner: Option<Arc<dyn MarkerScanner>>,
}

impl SessionBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            working_dir: None,
            executor: Arc::new(ProcessExecutor),
            display: Arc::new(LogDisplay),
            scanner: None,
        }
    }

    pub fn working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Derive the working directory from the editor's open folders and
    /// active file.
    pub fn editor_context(self, folders: &[PathBuf], active_file: Option<&Path>) -> Self {
        let dir = working_dir_for(folders, active_file);
        self.working_dir(dir)
    }

    pub fn executor(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn display(mut self, display: Arc<dyn ResultDisplay>) -> Self {
        self.display = display;
        self
    }

    pub fn scanner(mut self, scanner: Arc<dyn MarkerScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    pub fn build(self) -> DrushApi {
        let store = CacheStore::from_config(&self.config);
        debug!(
            "Session for {:?} with cache at {}",
            self.working_dir,
            store.root().display()
        );

        let mut locator = RootLocator::new(
            self.working_dir,
            store.clone(),
            self.executor.clone(),
            self.config.drush_path.clone(),
        )
        .with_max_age(self.config.root_ttl());
        if let Some(scanner) = self.scanner {
            locator = locator.with_scanner(scanner);
        }

        let runner = CommandRunner::new(
            self.config.drush_path.clone(),
            self.executor.clone(),
            self.display,
        );
        let metadata = MetadataCache::new(
            store.clone(),
            self.executor.clone(),
            self.config.drush_path.clone(),
        )
        .with_max_age(self.config.metadata_ttl());

        DrushApi {
            config: self.config,
            store,
            executor: self.executor,
            locator,
            runner,
            metadata,
        }
    }
}
