use std::path::PathBuf;
use thiserror::Error;

use crate::batch::BatchReport;

/// The main error type for labelviz operations.
///
/// Only conditions that stop a whole run end up here. Problems with a single
/// annotation/image pair are recorded in the [`BatchReport`] instead.
#[derive(Debug, Error)]
pub enum VizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input directory {path}: {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to parse style file {path}: {source}")]
    StyleParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid style in {path}: {message}")]
    StyleInvalid { path: PathBuf, message: String },

    #[error("Failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("Batch incomplete: {skipped} of {total} annotation file(s) skipped")]
    BatchIncomplete {
        skipped: usize,
        total: usize,
        report: BatchReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Why a parsed JSON value could not be turned into an annotation document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The top-level value is neither a mapping nor a sequence.
    #[error("expected a record object or an array of records, found {found}")]
    UnrecognizedShape { found: &'static str },

    /// Polygon-only documents must carry `points` when given as a single object.
    #[error("single-object document has no `points` field")]
    MissingPoints,
}
