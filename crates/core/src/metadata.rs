//! Memoized drush discovery: command descriptors and valid arguments

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::{
    cache::CacheStore,
    command::{DrushCommand, ToolExecutor},
    config::DEFAULT_METADATA_TTL_SECS,
    error::{Error, Result},
    types::ProjectRoot,
};

/// Entry name of the full command document inside a root's bin.
pub const COMMANDS_CACHE_ENTRY: &str = "commands";

pub struct MetadataCache {
    store: CacheStore,
    executor: Arc<dyn ToolExecutor>,
    drush_path: String,
    max_age: Duration,
}

impl MetadataCache {
    pub fn new(store: CacheStore, executor: Arc<dyn ToolExecutor>, drush_path: impl Into<String>) -> Self {
        Self {
            store,
            executor,
            drush_path: drush_path.into(),
            max_age: Duration::from_secs(DEFAULT_METADATA_TTL_SECS),
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Descriptor of `command` at `core.commands.<command>` in drush's
    /// self-reported command document.
    pub fn command_metadata(&self, root: &ProjectRoot, command: &str) -> Result<Value> {
        let entry = self.store.bin_path(&root.bin_name())?.join(COMMANDS_CACHE_ENTRY);

        if let Some(document) = self.store.read::<Value>(&entry, self.max_age)? {
            if let Some(descriptor) = command_descriptor(&document, command) {
                debug!("Command info for '{}' loaded from cache", command);
                return Ok(descriptor.clone());
            }
            debug!("Cached command document has no '{}', refreshing", command);
        }

        let document = self.fetch_command_document(root)?;
        self.store.write(&entry, &document)?;
        command_descriptor(&document, command)
            .cloned()
            .ok_or_else(|| Error::UnknownCommand(command.to_string()))
    }

    /// Valid argument tokens for `command` in this root, one per line of
    /// `drush --pipe <command>`.
    pub fn command_args(&self, root: &ProjectRoot, command: &str) -> Result<Vec<String>> {
        let bin = self.store.bin_path(&format!("{}/{}", root.bin_name(), command))?;
        let entry = bin.join(command);

        if let Some(args) = self.store.read::<Vec<String>>(&entry, self.max_age)? {
            debug!("Arguments for '{}' loaded from cache", command);
            return Ok(args);
        }

        let pipe = DrushCommand::new(&self.drush_path, [root.to_flag(), "--pipe".to_string(), command.to_string()]);
        let output = self.executor.execute(&pipe)?;
        let args: Vec<String> = output.stdout.lines().map(str::to_string).collect();

        self.store.write(&entry, &args)?;
        Ok(args)
    }

    fn fetch_command_document(&self, root: &ProjectRoot) -> Result<Value> {
        let mut command = DrushCommand::new(&self.drush_path, ["--format=json"]);
        if root.path().is_dir() {
            command = command.with_working_dir(PathBuf::from(root.path()));
        }
        let output = self.executor.execute(&command)?;
        Ok(serde_json::from_str(&output.stdout)?)
    }
}

fn command_descriptor<'a>(document: &'a Value, command: &str) -> Option<&'a Value> {
    document.get("core")?.get("commands")?.get(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ToolOutput;
    use crate::testing::ScriptedExecutor;
    use crate::types::RootSource;
    use serde_json::json;
    use tempfile::TempDir;

    fn commands_document() -> String {
        json!({
            "core": {
                "commands": {
                    "cache-clear": {
                        "command": "cache-clear",
                        "description": "Clear a specific cache, or all drupal caches.",
                        "aliases": ["cc"]
                    },
                    "cron": {"command": "cron", "aliases": []}
                }
            }
        })
        .to_string()
    }

    fn setup(executor: ScriptedExecutor) -> (TempDir, MetadataCache, Arc<ScriptedExecutor>) {
        let temp = TempDir::new().unwrap();
        let executor = Arc::new(executor);
        let cache = MetadataCache::new(CacheStore::new(temp.path()), executor.clone(), "drush");
        (temp, cache, executor)
    }

    fn root() -> ProjectRoot {
        ProjectRoot::new("/var/www/site", RootSource::Cached)
    }

    #[test]
    fn test_command_metadata_is_memoized() -> Result<()> {
        let (_temp, cache, executor) =
            setup(ScriptedExecutor::new().on(["--format=json"], ToolOutput::success(commands_document())));

        let descriptor = cache.command_metadata(&root(), "cache-clear")?;
        assert_eq!(descriptor["aliases"], json!(["cc"]));

        let descriptor = cache.command_metadata(&root(), "cron")?;
        assert_eq!(descriptor["command"], "cron");

        // Second lookup is served from disk
        assert_eq!(executor.call_count(), 1);
        assert_eq!(executor.calls()[0].args, vec!["--format=json"]);
        Ok(())
    }

    #[test]
    fn test_unknown_command_is_an_error() -> Result<()> {
        let (_temp, cache, executor) =
            setup(ScriptedExecutor::new().on(["--format=json"], ToolOutput::success(commands_document())));

        cache.command_metadata(&root(), "cron")?;
        let err = cache.command_metadata(&root(), "no-such-command").unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(ref name) if name == "no-such-command"));

        // The cached document was refreshed once before giving up
        assert_eq!(executor.call_count(), 2);
        Ok(())
    }

    #[test]
    fn test_expired_metadata_is_refetched() -> Result<()> {
        let (_temp, cache, executor) =
            setup(ScriptedExecutor::new().on(["--format=json"], ToolOutput::success(commands_document())));
        let cache = cache.with_max_age(Duration::ZERO);

        cache.command_metadata(&root(), "cron")?;
        cache.command_metadata(&root(), "cron")?;
        assert_eq!(executor.call_count(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_document_propagates() {
        let (_temp, cache, _) =
            setup(ScriptedExecutor::new().on(["--format=json"], ToolOutput::success("Drush command terminated abnormally")));
        let err = cache.command_metadata(&root(), "cron").unwrap_err();
        assert!(matches!(err, Error::SerializationError(_)));
    }

    #[test]
    fn test_command_args_per_root_and_command() -> Result<()> {
        let (_temp, cache, executor) = setup(
            ScriptedExecutor::new()
                .on(["--pipe", "cache-clear"], ToolOutput::success("all\ntheme-registry\nmenu\ncss-js\n"))
                .on(["--pipe", "pm-enable"], ToolOutput::success("views\n")),
        );

        let args = cache.command_args(&root(), "cache-clear")?;
        assert_eq!(args, vec!["all", "theme-registry", "menu", "css-js"]);
        assert_eq!(cache.command_args(&root(), "cache-clear")?, args);
        assert_eq!(executor.call_count(), 1);
        assert_eq!(
            executor.calls()[0].args,
            vec!["--root=/var/www/site", "--pipe", "cache-clear"]
        );

        // A different command gets its own bin
        assert_eq!(cache.command_args(&root(), "pm-enable")?, vec!["views"]);

        // So does the same command under another root
        let other = ProjectRoot::new("/srv/other", RootSource::Scanned);
        cache.command_args(&other, "cache-clear")?;
        assert_eq!(executor.call_count(), 3);
        Ok(())
    }
}
