//! One subject's row of canonical measurements.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::key::StandardKey;
use crate::provenance::ProvenanceRecord;

/// A subject row: every standard key holds a canonical value or NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    pub subject_id: String,
    /// Source key the row was read from.
    pub source: String,
    /// Source file as configured.
    pub file: String,
    /// Zero-based data row within the source file.
    pub row_index: usize,
    values: BTreeMap<StandardKey, f64>,
    provenance: BTreeMap<StandardKey, ProvenanceRecord>,
}

impl MeasurementRecord {
    /// A row with every key set to NaN.
    pub fn new(
        subject_id: impl Into<String>,
        source: impl Into<String>,
        file: impl Into<String>,
        row_index: usize,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            source: source.into(),
            file: file.into(),
            row_index,
            values: StandardKey::ALL.iter().map(|key| (*key, f64::NAN)).collect(),
            provenance: BTreeMap::new(),
        }
    }

    pub fn value(&self, key: StandardKey) -> f64 {
        self.values.get(&key).copied().unwrap_or(f64::NAN)
    }

    /// The value when present (not NaN).
    pub fn present(&self, key: StandardKey) -> Option<f64> {
        let value = self.value(key);
        if value.is_nan() { None } else { Some(value) }
    }

    pub fn set(&mut self, key: StandardKey, value: f64, provenance: ProvenanceRecord) {
        self.values.insert(key, value);
        self.provenance.insert(key, provenance);
    }

    /// Replace a value with NaN, returning what was there and its provenance.
    pub fn clear(&mut self, key: StandardKey) -> (f64, Option<ProvenanceRecord>) {
        let previous = self.values.insert(key, f64::NAN).unwrap_or(f64::NAN);
        (previous, self.provenance.remove(&key))
    }

    pub fn provenance(&self, key: StandardKey) -> Option<&ProvenanceRecord> {
        self.provenance.get(&key)
    }

    pub fn age(&self) -> Option<f64> {
        self.present(StandardKey::AgeYr)
    }

    /// Values in [`StandardKey::ALL`] order.
    pub fn values_in_order(&self) -> impl Iterator<Item = f64> + '_ {
        StandardKey::ALL.iter().map(|key| self.value(*key))
    }
}
