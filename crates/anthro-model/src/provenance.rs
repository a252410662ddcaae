//! Per-value provenance for canonical measurements.

use serde::{Deserialize, Serialize};

use crate::unit::{CanonicalUnit, SourceUnit};

/// Where a canonical value came from and how it was converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub source_file: String,
    pub source_column: String,
    /// False only when the value was already in its canonical unit and not rounded.
    pub conversion_applied: bool,
    pub source_unit: SourceUnit,
    pub canonical_unit: CanonicalUnit,
    /// Resolution label such as `"0.001m"`, or `"native"` for unquantized fields.
    pub quantization: String,
    /// Raw cell text before conversion.
    pub raw_value: String,
}

/// Human label for a quantization step in meters.
pub fn quantization_label(step_m: f64) -> String {
    format!("{step_m}m")
}

pub const NATIVE_RESOLUTION: &str = "native";
