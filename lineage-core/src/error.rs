//! Error types for lineage-core.
//!
//! Only loading can fail. Graph extraction and filtering degrade to
//! placeholders instead of returning errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for lineage-core operations.
pub type Result<T> = std::result::Result<T, LineageError>;

/// Errors that can occur while loading run events.
#[derive(Error, Debug)]
pub enum LineageError {
    /// The event file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON Lines record is not valid JSON.
    #[error("Invalid JSON on line {line}: {source}")]
    JsonLine {
        /// 1-based line number.
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but not an event list.
    #[error("Unrecognised event document: {message}")]
    UnrecognisedDocument {
        /// What was found instead.
        message: String,
    },
}
