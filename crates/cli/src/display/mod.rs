use std::io::Write;

use subdrush_core::ResultDisplay;

/// Renders result blocks on stderr, framed by the panel name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn format(panel: &str, syntax: &str, text: &str) -> String {
        let header = format!("── {panel} ({syntax}) ");
        let mut block = format!("{header}{}\n{text}", "─".repeat(60usize.saturating_sub(header.chars().count())));
        if !block.ends_with('\n') {
            block.push('\n');
        }
        block
    }
}

impl ResultDisplay for TerminalDisplay {
    fn render(&self, panel: &str, syntax: &str, text: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(Self::format(panel, syntax, text).as_bytes());
    }
}
