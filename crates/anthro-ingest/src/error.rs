//! Error types for raw survey ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading source files.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited data.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The file has no header row.
    #[error("no header row in {path}")]
    MissingHeader { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
