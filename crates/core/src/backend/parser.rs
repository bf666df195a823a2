use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

pub const LOG_MARKER: &str = "DRUSH_BACKEND:";
pub const OUTPUT_START_MARKER: &str = "DRUSH_BACKEND_OUTPUT_START>>>";
pub const OUTPUT_END_MARKER: &str = "<<<DRUSH_BACKEND_OUTPUT_END";

/// Which kind of run produced the text. Only affects how parse problems are
/// labelled in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Normal,
    Error,
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Normal => write!(f, "normal"),
            ParseMode::Error => write!(f, "error"),
        }
    }
}

/// Classification of one line of backend output.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendLine<'a> {
    Log(Value),
    Message(Value),
    /// Plain text, including its original line ending
    Raw(&'a str),
    Skipped(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendResult {
    pub log: Vec<Value>,
    pub message: Vec<Value>,
    pub message_raw: String,
}

impl BackendResult {
    fn absorb(&mut self, line: BackendLine<'_>, mode: ParseMode) {
        match line {
            BackendLine::Log(value) => self.log.push(value),
            BackendLine::Message(value) => self.message.push(value),
            BackendLine::Raw(text) => {
                self.message_raw.push_str(text);
                if !text.ends_with('\n') {
                    self.message_raw.push('\n');
                }
            }
            BackendLine::Skipped(reason) => {
                debug!("Skipping backend packet ({} output): {}", mode, reason);
            }
        }
    }

    /// The `output` string of the first message packet, if any.
    pub fn first_output(&self) -> Option<&str> {
        self.message
            .first()
            .and_then(|m| m.get("output"))
            .and_then(Value::as_str)
    }

    /// The `error_log` object of the first message packet, if any.
    pub fn first_error_log(&self) -> Option<&serde_json::Map<String, Value>> {
        self.message
            .first()
            .and_then(|m| m.get("error_log"))
            .and_then(Value::as_object)
    }
}

/// Classify a single line. `line` may still carry its line terminator.
pub fn classify_line(line: &str) -> BackendLine<'_> {
    if let Some(pos) = line.find(LOG_MARKER) {
        let payload = &line[pos + LOG_MARKER.len()..];
        return match serde_json::from_str(payload.trim()) {
            Ok(value) => BackendLine::Log(value),
            Err(e) => BackendLine::Skipped(format!("invalid log packet: {e}")),
        };
    }

    if let Some(pos) = line.find(OUTPUT_START_MARKER) {
        let rest = &line[pos + OUTPUT_START_MARKER.len()..];
        let payload = rest
            .find(OUTPUT_END_MARKER)
            .map_or(rest, |end| &rest[..end]);
        return match serde_json::from_str(payload.trim()) {
            Ok(value) => BackendLine::Message(value),
            Err(e) => BackendLine::Skipped(format!("invalid output packet: {e}")),
        };
    }

    BackendLine::Raw(line)
}

/// Split captured drush output into log packets, message packets and the
/// remaining plain text. Never fails: a bad packet is skipped and the plain
/// text is always preserved.
pub fn parse_backend_output(data: &str, mode: ParseMode) -> BackendResult {
    let cleaned = data.replace('\0', "");
    let mut result = BackendResult::default();

    for line in cleaned.split_inclusive('\n') {
        result.absorb(classify_line(line), mode);
    }

    debug!(
        "Parsed {} output: {} log packets, {} message packets, {} bytes of text",
        mode,
        result.log.len(),
        result.message.len(),
        result.message_raw.len()
    );
    result
}
