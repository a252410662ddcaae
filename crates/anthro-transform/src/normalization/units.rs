//! Unit Canonicalizer.
//!
//! Lengths are divided by the source unit's scale and quantized to the
//! configured step in meters. Mass and age pass through unscaled but must
//! still be finite numbers. Failures are values, not errors: the caller turns
//! them into NaN plus a warning.

use anthro_ingest::{RawCell, classify_cell};
use anthro_model::{
    CurationOptions, MeasurementKind, NATIVE_RESOLUTION, ProvenanceRecord, SourceUnit, StandardKey,
    WarningReason, quantization_label,
};

use super::numeric::parse_f64;
use super::quantize::quantize_scaled;

/// Why a raw value could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionFailure {
    NonNumeric,
    UnsupportedUnit(String),
    IncompatibleUnit { unit: SourceUnit, kind: MeasurementKind },
    NonFinite,
}

impl ConversionFailure {
    pub fn details(&self) -> String {
        match self {
            Self::NonNumeric => "non-numeric value".to_string(),
            Self::UnsupportedUnit(unit) => format!("unsupported source unit '{unit}'"),
            Self::IncompatibleUnit { unit, kind } => {
                format!("unit '{unit}' cannot feed a {} field", kind.as_str())
            }
            Self::NonFinite => "conversion produced a non-finite value".to_string(),
        }
    }
}

/// Convert a numeric raw value of `unit` into the canonical unit of `kind`.
pub fn convert_value(
    value: f64,
    unit: SourceUnit,
    kind: MeasurementKind,
    quantization_m: f64,
) -> Result<f64, ConversionFailure> {
    if !value.is_finite() {
        return Err(ConversionFailure::NonFinite);
    }
    if !unit.is_compatible_with(kind) {
        return Err(ConversionFailure::IncompatibleUnit { unit, kind });
    }
    let converted = match kind {
        MeasurementKind::Length => quantize_scaled(value, unit.scale(), quantization_m),
        MeasurementKind::Mass | MeasurementKind::Age => value,
    };
    if converted.is_finite() {
        Ok(converted)
    } else {
        Err(ConversionFailure::NonFinite)
    }
}

/// Identifies the cell being converted, for provenance.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub file: &'a str,
    pub column: &'a str,
    /// Unit declared on the mapping entry, if any.
    pub declared_unit: Option<&'a str>,
}

/// Result of canonicalizing one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Value {
        value: f64,
        provenance: ProvenanceRecord,
    },
    Failed {
        reason: WarningReason,
        details: String,
    },
}

impl CellOutcome {
    fn failed(reason: WarningReason, details: impl Into<String>) -> Self {
        Self::Failed {
            reason,
            details: details.into(),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value { value, .. } => Some(*value),
            Self::Failed { .. } => None,
        }
    }
}

/// Canonicalize one raw cell for `key`.
pub fn canonicalize_cell(
    raw: &str,
    key: StandardKey,
    context: CellContext<'_>,
    options: &CurationOptions,
) -> CellOutcome {
    let text = match classify_cell(raw) {
        RawCell::Missing => {
            return CellOutcome::failed(WarningReason::ValueMissing, "empty or missing cell");
        }
        RawCell::Text(text) => text,
    };
    let kind = key.kind();
    let unit = match context.declared_unit {
        Some(declared) => match SourceUnit::parse(declared) {
            Some(unit) => unit,
            None => {
                return CellOutcome::failed(
                    WarningReason::UnitConversionFailed,
                    ConversionFailure::UnsupportedUnit(declared.to_string()).details(),
                );
            }
        },
        None => options.default_unit_for(kind),
    };
    let Some(number) = parse_f64(text) else {
        let failure = if text.parse::<f64>().is_ok() {
            ConversionFailure::NonFinite
        } else {
            ConversionFailure::NonNumeric
        };
        return CellOutcome::failed(WarningReason::UnitConversionFailed, failure.details());
    };
    match convert_value(number, unit, kind, options.quantization_m) {
        Ok(value) => {
            let quantized = kind == MeasurementKind::Length;
            CellOutcome::Value {
                value,
                provenance: ProvenanceRecord {
                    source_file: context.file.to_string(),
                    source_column: context.column.to_string(),
                    conversion_applied: quantized,
                    source_unit: unit,
                    canonical_unit: kind.canonical_unit(),
                    quantization: if quantized {
                        quantization_label(options.quantization_m)
                    } else {
                        NATIVE_RESOLUTION.to_string()
                    },
                    raw_value: text.to_string(),
                },
            }
        }
        Err(failure) => CellOutcome::failed(WarningReason::UnitConversionFailed, failure.details()),
    }
}

#[cfg(test)]
mod tests {
    use anthro_model::CanonicalUnit;

    use super::*;

    fn context(unit: Option<&'static str>) -> CellContext<'static> {
        CellContext {
            file: "raw/7th.csv",
            column: "허리둘레",
            declared_unit: unit,
        }
    }

    fn reason(outcome: &CellOutcome) -> Option<WarningReason> {
        match outcome {
            CellOutcome::Failed { reason, .. } => Some(*reason),
            CellOutcome::Value { .. } => None,
        }
    }

    #[test]
    fn millimeters_become_quantized_meters() {
        let options = CurationOptions::default();
        let outcome = canonicalize_cell("905", StandardKey::WaistCircM, context(Some("mm")), &options);
        let CellOutcome::Value { value, provenance } = outcome else {
            panic!("expected a value");
        };
        assert_eq!(value, 0.905);
        assert!(provenance.conversion_applied);
        assert_eq!(provenance.source_unit, SourceUnit::Millimeter);
        assert_eq!(provenance.canonical_unit, CanonicalUnit::Meter);
        assert_eq!(provenance.quantization, "0.001m");
        assert_eq!(provenance.raw_value, "905");
    }

    #[test]
    fn undeclared_length_unit_uses_default() {
        let options = CurationOptions::default();
        let outcome = canonicalize_cell("1000", StandardKey::HeightM, context(None), &options);
        assert_eq!(outcome.value(), Some(1.0));
    }

    #[test]
    fn centimeters_and_meters() {
        let options = CurationOptions::default();
        let cm = canonicalize_cell("80.25", StandardKey::WaistCircM, context(Some("cm")), &options);
        assert_eq!(cm.value(), Some(0.803));
        let m = canonicalize_cell("0.80249", StandardKey::WaistCircM, context(Some("m")), &options);
        assert_eq!(m.value(), Some(0.802));
    }

    #[test]
    fn weight_passes_through_unscaled() {
        let options = CurationOptions::default();
        let outcome = canonicalize_cell("65.37", StandardKey::WeightKg, context(None), &options);
        let CellOutcome::Value { value, provenance } = outcome else {
            panic!("expected a value");
        };
        assert_eq!(value, 65.37);
        assert!(!provenance.conversion_applied);
        assert_eq!(provenance.canonical_unit, CanonicalUnit::Kilogram);
        assert_eq!(provenance.quantization, NATIVE_RESOLUTION);
    }

    #[test]
    fn missing_cells_are_value_missing() {
        let options = CurationOptions::default();
        for raw in ["", "NA", "nan"] {
            let outcome = canonicalize_cell(raw, StandardKey::HeightM, context(None), &options);
            assert_eq!(reason(&outcome), Some(WarningReason::ValueMissing));
        }
    }

    #[test]
    fn bad_values_and_units_fail_conversion() {
        let options = CurationOptions::default();
        let cases = [
            ("abc", Some("mm"), StandardKey::HeightM),
            ("inf", Some("mm"), StandardKey::HeightM),
            ("1700", Some("inch"), StandardKey::HeightM),
            ("1700", Some("kg"), StandardKey::HeightM),
            ("65", Some("cm"), StandardKey::WeightKg),
        ];
        for (raw, unit, key) in cases {
            let outcome = canonicalize_cell(raw, key, context(unit), &options);
            assert_eq!(
                reason(&outcome),
                Some(WarningReason::UnitConversionFailed),
                "{raw} {unit:?} {key}"
            );
        }
    }

    #[test]
    fn unsupported_unit_details_name_the_unit() {
        let options = CurationOptions::default();
        let outcome = canonicalize_cell("1700", StandardKey::HeightM, context(Some("inch")), &options);
        let CellOutcome::Failed { details, .. } = outcome else {
            panic!("expected failure");
        };
        assert!(details.contains("inch"));
    }
}
