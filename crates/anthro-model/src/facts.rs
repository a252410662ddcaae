//! Facts-only summary of a curated table.
//!
//! Observed statistics and warning counts. There is no verdict here; gating
//! belongs to whatever consumes the report.

use serde::{Deserialize, Serialize};

use crate::key::StandardKey;
use crate::options::CurationOptions;
use crate::warning::WarningReason;

/// Statistics for one standard-key column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFacts {
    pub key: StandardKey,
    /// Non-NaN values.
    pub count: usize,
    pub nan: usize,
    /// `nan / (count + nan) * 100`, one decimal.
    pub nan_pct: f64,
    pub min: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

/// Warnings sharing a standard key and reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningGroup {
    pub standard_key: Option<StandardKey>,
    pub reason: WarningReason,
    pub count: usize,
}

/// Per-source input facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFacts {
    pub source: String,
    pub file: String,
    pub rows: usize,
    pub sha256: String,
    pub unmapped_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactsSummary {
    pub total_rows: usize,
    pub total_warnings: usize,
    pub columns: Vec<ColumnFacts>,
    pub warnings_top_n: Vec<WarningGroup>,
    pub sources: Vec<SourceFacts>,
    /// SHA-256 of the curated table bytes, when it was rendered.
    pub curated_sha256: Option<String>,
    pub options: CurationOptions,
}

impl FactsSummary {
    pub fn column(&self, key: StandardKey) -> Option<&ColumnFacts> {
        self.columns.iter().find(|facts| facts.key == key)
    }
}
