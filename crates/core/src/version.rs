//! Drush version probe

use tracing::warn;

use crate::{
    command::{DrushCommand, ToolExecutor},
    error::Result,
};

/// Oldest drush major version whose backend output is understood.
pub const REQUIRED_MAJOR_VERSION: u32 = 6;

/// Major version from `drush --version --pipe` output, 0 when unknown.
pub fn parse_major_version(output: &str) -> u32 {
    output
        .trim_start()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0)
}

pub fn drush_major_version(executor: &dyn ToolExecutor, drush_path: &str) -> Result<u32> {
    let command = DrushCommand::new(drush_path, ["--version", "--pipe"]);
    let output = executor.execute(&command)?;
    Ok(parse_major_version(&output.stdout))
}

/// Whether the installed drush is recent enough. An outdated drush is
/// reported in the log, not treated as an error.
pub fn meets_requirements(major_version: u32) -> bool {
    if major_version < REQUIRED_MAJOR_VERSION {
        warn!(
            "Drush major version outdated: {}. Please upgrade to Drush {}!",
            major_version, REQUIRED_MAJOR_VERSION
        );
        return false;
    }
    true
}
