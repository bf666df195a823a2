//! Configuration management for subdrush

mod settings;

pub use settings::{
    Config, DEFAULT_DRUSH_PATH, DEFAULT_METADATA_TTL_SECS, DEFAULT_ROOT_TTL_SECS,
};
