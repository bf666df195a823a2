use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_DRUSH_PATH: &str = "/usr/local/bin/drush";
pub const DEFAULT_METADATA_TTL_SECS: u64 = 360;
pub const DEFAULT_ROOT_TTL_SECS: u64 = 86_400;

const DRUSH_PATH_ENV: &str = "SUBDRUSH_DRUSH_PATH";
const CACHE_DIR_ENV: &str = "SUBDRUSH_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Drush executable to invoke
    pub drush_path: String,

    /// Overrides the platform cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Validity window for command metadata and argument lists
    pub metadata_ttl_secs: u64,

    /// Validity window for a persisted project root
    pub root_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            drush_path: DEFAULT_DRUSH_PATH.to_string(),
            cache_dir: None,
            metadata_ttl_secs: DEFAULT_METADATA_TTL_SECS,
            root_ttl_secs: DEFAULT_ROOT_TTL_SECS,
        }
    }
}

impl Config {
    /// Load the nearest config file above `start_path`, then apply
    /// environment overrides.
    pub fn load(start_path: &Path) -> Result<Self> {
        let config = match Self::find_config_file(start_path) {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::load_from_file(&path)?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            let config_path = current.join(".subdrush.json");
            if config_path.exists() {
                return Some(config_path);
            }

            let config_path = current.join("subdrush.json");
            if config_path.exists() {
                return Some(config_path);
            }

            current = current.parent()?;
        }
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env_value(DRUSH_PATH_ENV) {
            self.drush_path = path;
        }
        if let Some(dir) = env_value(CACHE_DIR_ENV) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_ttl_secs)
    }

    pub fn root_ttl(&self) -> Duration {
        Duration::from_secs(self.root_ttl_secs)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.drush_path, "/usr/local/bin/drush");
        assert_eq!(config.metadata_ttl(), Duration::from_secs(360));
        assert_eq!(config.root_ttl(), Duration::from_secs(24 * 60 * 60));
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"drush_path": "/opt/drush/drush"}"#).unwrap();
        assert_eq!(config.drush_path, "/opt/drush/drush");
        assert_eq!(config.metadata_ttl_secs, DEFAULT_METADATA_TTL_SECS);
        assert_eq!(config.root_ttl_secs, DEFAULT_ROOT_TTL_SECS);
    }

    #[test]
    fn test_find_config_file_walks_up() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("sites/all/modules");
        std::fs::create_dir_all(&nested)?;

        let config = Config {
            drush_path: "/usr/bin/drush".to_string(),
            cache_dir: Some(temp_dir.path().join("cache")),
            ..Config::default()
        };
        let config_path = temp_dir.path().join(".subdrush.json");
        config.save_to_file(&config_path)?;

        assert_eq!(Config::find_config_file(&nested), Some(config_path.clone()));
        assert_eq!(Config::load_from_file(&config_path)?, config);
        Ok(())
    }

    #[test]
    fn test_env_overrides_config_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("sites/default");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(
            temp_dir.path().join(".subdrush.json"),
            r#"{"drush_path": "/from/file/drush", "cache_dir": "/from/file/cache", "metadata_ttl_secs": 10}"#,
        )?;

        // Only test in this binary that touches the process environment
        unsafe {
            std::env::set_var(DRUSH_PATH_ENV, "/from/env/drush");
            std::env::set_var(CACHE_DIR_ENV, "/from/env/cache");
        }
        let overridden = Config::load(&nested);
        unsafe {
            std::env::remove_var(DRUSH_PATH_ENV);
            std::env::remove_var(CACHE_DIR_ENV);
        }

        let overridden = overridden?;
        assert_eq!(overridden.drush_path, "/from/env/drush");
        assert_eq!(overridden.cache_dir, Some(PathBuf::from("/from/env/cache")));
        assert_eq!(overridden.metadata_ttl_secs, 10);

        let from_file = Config::load(&nested)?;
        assert_eq!(from_file.drush_path, "/from/file/drush");
        assert_eq!(from_file.cache_dir, Some(PathBuf::from("/from/file/cache")));
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_reported() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("subdrush.json");
        std::fs::write(&config_path, "{ not json")?;

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        Ok(())
    }
}
