//! Where rendered results end up

use tracing::error;

/// Panel name used for failed commands.
pub const ERROR_PANEL: &str = "drush-error";
/// Syntax the failure block is written in.
pub const ERROR_SYNTAX: &str = "YAML";

/// Shows a block of text to the user, e.g. in an editor output panel.
pub trait ResultDisplay: Send + Sync {
    fn render(&self, panel: &str, syntax: &str, text: &str);
}

/// Display that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl ResultDisplay for LogDisplay {
    fn render(&self, panel: &str, _syntax: &str, text: &str) {
        error!("[{}]\n{}", panel, text);
    }
}
