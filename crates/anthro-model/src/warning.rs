//! Structured data-quality warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key::StandardKey;

/// Why a cell did not yield a clean canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    ColumnNotPresent,
    ValueMissing,
    UnitConversionFailed,
    OutlierRemoved,
}

impl WarningReason {
    pub const ALL: [WarningReason; 4] = [
        Self::ColumnNotPresent,
        Self::ValueMissing,
        Self::UnitConversionFailed,
        Self::OutlierRemoved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ColumnNotPresent => "column_not_present",
            Self::ValueMissing => "value_missing",
            Self::UnitConversionFailed => "unit_conversion_failed",
            Self::OutlierRemoved => "outlier_removed",
        }
    }
}

impl fmt::Display for WarningReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell-level warning. Serialized as one JSON line in the warnings log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningEntry {
    /// Source key from the mapping table.
    pub source: String,
    /// Source file path as configured.
    pub file: String,
    /// Raw source column, when one is involved.
    pub column: Option<String>,
    pub standard_key: Option<StandardKey>,
    pub reason: WarningReason,
    /// Zero-based data row within the source file.
    pub row_index: usize,
    pub subject_id: String,
    /// Raw cell text (or canonical value for outliers), kept for audit.
    pub original_value: Option<String>,
    pub details: String,
}

impl WarningEntry {
    /// Grouping key used by the facts report.
    pub fn group_key(&self) -> (Option<StandardKey>, WarningReason) {
        (self.standard_key, self.reason)
    }
}

/// Destination for warnings. Every pipeline stage receives one explicitly.
pub trait WarningSink {
    fn record(&mut self, entry: WarningEntry);
}

impl WarningSink for Vec<WarningEntry> {
    fn record(&mut self, entry: WarningEntry) {
        self.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_serializes_snake_case() {
        for reason in WarningReason::ALL {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.as_str()));
        }
    }
}
