//! Run options for the curation pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{CurationError, Result};
use crate::key::MeasurementKind;
use crate::unit::SourceUnit;

/// What happens to source columns that map to no standard key.
///
/// One policy applies to a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedColumnPolicy {
    /// Exclude unmapped columns.
    #[default]
    Drop,
    /// Carry them as `ko__<name>__unmapped` in a sidecar table.
    PreservePrefixed,
}

impl UnmappedColumnPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::PreservePrefixed => "preserve_prefixed",
        }
    }
}

/// Name under which an unmapped column is preserved.
pub fn preserved_column_name(original: &str) -> String {
    format!("ko__{original}__unmapped")
}

/// Options recognized by a curation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurationOptions {
    /// Inclusive lower bound of the outlier age band, in years.
    pub age_band_min: f64,
    /// Inclusive upper bound of the outlier age band, in years.
    pub age_band_max: f64,
    pub zscore_threshold: f64,
    /// Quantization step for length fields, in meters.
    pub quantization_m: f64,
    pub unmapped_column_policy: UnmappedColumnPolicy,
    pub warnings_top_n: usize,
    /// Unit assumed for length columns without a declared unit.
    pub default_length_unit: SourceUnit,
    pub delimiter: char,
}

impl Default for CurationOptions {
    fn default() -> Self {
        Self {
            age_band_min: 20.0,
            age_band_max: 59.0,
            zscore_threshold: 3.0,
            quantization_m: 0.001,
            unmapped_column_policy: UnmappedColumnPolicy::Drop,
            warnings_top_n: 12,
            default_length_unit: SourceUnit::Millimeter,
            delimiter: ',',
        }
    }
}

impl CurationOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.age_band_min.is_finite() || !self.age_band_max.is_finite() {
            return Err(CurationError::config("age band bounds must be finite"));
        }
        if self.age_band_min > self.age_band_max {
            return Err(CurationError::config(format!(
                "age_band_min ({}) exceeds age_band_max ({})",
                self.age_band_min, self.age_band_max
            )));
        }
        if !(self.zscore_threshold.is_finite() && self.zscore_threshold > 0.0) {
            return Err(CurationError::config("zscore_threshold must be positive"));
        }
        if !(self.quantization_m.is_finite() && self.quantization_m > 0.0) {
            return Err(CurationError::config("quantization_m must be positive"));
        }
        if !self
            .default_length_unit
            .is_compatible_with(MeasurementKind::Length)
        {
            return Err(CurationError::config(format!(
                "default_length_unit '{}' is not a length unit",
                self.default_length_unit
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(CurationError::config("delimiter must be a single ASCII character"));
        }
        Ok(())
    }

    /// Unit assumed for a column of `kind` with no declared unit.
    pub fn default_unit_for(&self, kind: MeasurementKind) -> SourceUnit {
        match kind {
            MeasurementKind::Length => self.default_length_unit,
            MeasurementKind::Mass => SourceUnit::Kilogram,
            MeasurementKind::Age => SourceUnit::Year,
        }
    }

    pub fn in_age_band(&self, age: f64) -> bool {
        age >= self.age_band_min && age <= self.age_band_max
    }
}
