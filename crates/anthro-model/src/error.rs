//! Fatal errors of a curation run.
//!
//! Data-quality problems never surface here; they become warnings. Only
//! configuration and schema problems abort a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurationError {
    /// The mapping table or the curated table disagrees with the fixed key set.
    #[error("schema violation: {message}")]
    SchemaViolation { message: String },

    /// The same subject id was produced twice.
    #[error("duplicate subject id '{subject_id}' (first in {first_source}, again in {second_source})")]
    DuplicateSubject {
        subject_id: String,
        first_source: String,
        second_source: String,
    },

    /// A run option is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl CurationError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. })
    }
}

pub type Result<T> = std::result::Result<T, CurationError>;
