//! Decoding of drush `--backend` output
//!
//! With `--backend`, drush interleaves ordinary text with JSON packets
//! framed by sentinel markers. Log records arrive on lines carrying
//! `DRUSH_BACKEND:`, the command result arrives between
//! `DRUSH_BACKEND_OUTPUT_START>>>` and `<<<DRUSH_BACKEND_OUTPUT_END`.

pub mod parser;

pub use parser::{
    BackendLine, BackendResult, LOG_MARKER, OUTPUT_END_MARKER, OUTPUT_START_MARKER, ParseMode,
    classify_line, parse_backend_output,
};
