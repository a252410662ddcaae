//! Outlier Filter: per-column z-score rejection inside an age band.
//!
//! For every filterable key the mean and sample standard deviation are taken
//! over the non-NaN values of rows whose age lies in the configured band.
//! Values of those rows outside `[μ − kσ, μ + kσ]` become NaN and are reported
//! as `outlier_removed`. Columns with fewer than two values or σ = 0 are left
//! untouched. Rows with unknown age or outside the band are neither measured
//! nor filtered.

use tracing::debug;

use anthro_model::{
    CurationOptions, MeasurementRecord, StandardKey, WarningEntry, WarningReason, WarningSink,
};

/// Tolerance applied to band edges so values quantized onto `μ ± kσ` stay.
const BAND_EPSILON: f64 = 1e-9;

/// Mean and sample standard deviation of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub n: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl ColumnStats {
    /// Returns `None` for fewer than two values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        // Identical values must give σ = 0 exactly, not summation noise.
        let std_dev = if values.iter().all(|value| *value == values[0]) {
            0.0
        } else {
            let sum_sq: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
            (sum_sq / (n - 1) as f64).sqrt()
        };
        Some(Self { n, mean, std_dev })
    }
}

/// Inclusive acceptance band `[μ − kσ, μ + kσ]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBand {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBand {
    /// Returns `None` when σ is zero or not finite.
    pub fn new(mean: f64, std_dev: f64, threshold: f64) -> Option<Self> {
        if !std_dev.is_finite() || std_dev <= 0.0 || !mean.is_finite() {
            return None;
        }
        Some(Self {
            lower: mean - threshold * std_dev,
            upper: mean + threshold * std_dev,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower - BAND_EPSILON && value <= self.upper + BAND_EPSILON
    }
}

/// Why a column was not filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewValues,
    ZeroVariance,
}

/// Filter outcome for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutlierReport {
    pub key: StandardKey,
    pub stats: Option<ColumnStats>,
    pub band: Option<OutlierBand>,
    pub removed: usize,
    pub skipped: Option<SkipReason>,
}

/// Apply the outlier filter to every filterable key, in schema order.
pub fn filter_outliers(
    records: &mut [MeasurementRecord],
    options: &CurationOptions,
    sink: &mut dyn WarningSink,
) -> Vec<KeyOutlierReport> {
    let in_band: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.age().is_some_and(|age| options.in_age_band(age)))
        .map(|(idx, _)| idx)
        .collect();
    debug!(
        rows = records.len(),
        in_band = in_band.len(),
        age_band_min = options.age_band_min,
        age_band_max = options.age_band_max,
        "outlier age band selected"
    );

    StandardKey::ALL
        .iter()
        .copied()
        .filter(|key| key.is_filterable())
        .map(|key| filter_key(records, &in_band, key, options.zscore_threshold, sink))
        .collect()
}

fn filter_key(
    records: &mut [MeasurementRecord],
    in_band: &[usize],
    key: StandardKey,
    threshold: f64,
    sink: &mut dyn WarningSink,
) -> KeyOutlierReport {
    let values: Vec<f64> = in_band
        .iter()
        .filter_map(|idx| records[*idx].present(key))
        .collect();
    let Some(stats) = ColumnStats::compute(&values) else {
        return KeyOutlierReport {
            key,
            stats: None,
            band: None,
            removed: 0,
            skipped: Some(SkipReason::TooFewValues),
        };
    };
    let Some(band) = OutlierBand::new(stats.mean, stats.std_dev, threshold) else {
        return KeyOutlierReport {
            key,
            stats: Some(stats),
            band: None,
            removed: 0,
            skipped: Some(SkipReason::ZeroVariance),
        };
    };

    let mut removed = 0usize;
    for idx in in_band {
        let record = &mut records[*idx];
        let Some(value) = record.present(key) else {
            continue;
        };
        if band.contains(value) {
            continue;
        }
        let (_, provenance) = record.clear(key);
        removed += 1;
        let z = (value - stats.mean) / stats.std_dev;
        sink.record(WarningEntry {
            source: record.source.clone(),
            file: record.file.clone(),
            column: provenance.as_ref().map(|prov| prov.source_column.clone()),
            standard_key: Some(key),
            reason: WarningReason::OutlierRemoved,
            row_index: record.row_index,
            subject_id: record.subject_id.clone(),
            original_value: Some(
                provenance
                    .as_ref()
                    .map_or_else(|| value.to_string(), |prov| prov.raw_value.clone()),
            ),
            details: format!(
                "value {value} outside [{:.6}, {:.6}] (z = {z:.2}, mean = {:.6}, sd = {:.6}, n = {})",
                band.lower, band.upper, stats.mean, stats.std_dev, stats.n
            ),
        });
    }
    if removed > 0 {
        debug!(key = %key, removed, n = stats.n, "outliers removed");
    }
    KeyOutlierReport {
        key,
        stats: Some(stats),
        band: Some(band),
        removed,
        skipped: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_standard_deviation() {
        let stats = ColumnStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.n, 8);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn fewer_than_two_values_has_no_stats() {
        assert!(ColumnStats::compute(&[]).is_none());
        assert!(ColumnStats::compute(&[0.8]).is_none());
    }

    #[test]
    fn band_is_inclusive_at_three_sigma() {
        let band = OutlierBand::new(0.80, 0.05, 3.0).unwrap();
        assert!(band.contains(0.95));
        assert!(band.contains(0.65));
        assert!(!band.contains(0.951));
        assert!(!band.contains(0.649));
    }

    #[test]
    fn zero_variance_has_no_band() {
        assert!(OutlierBand::new(0.5, 0.0, 3.0).is_none());
    }
}
