//! Curated Dataset Assembler.
//!
//! Joins mapped and canonicalized rows of every source into one list of
//! subject records. Each (row, standard key) cell ends as a canonical value
//! or as NaN with exactly one warning. Sources are appended in configuration
//! order; rows are never merged, averaged or overwritten.

use std::collections::BTreeMap;

use tracing::{debug, info, trace};

use anthro_ingest::{SourceTable, is_missing_value};
use anthro_map::{ColumnMapper, KeySource};
use anthro_model::{
    CurationError, CurationOptions, MeasurementRecord, Result, SourceFacts, SourceMapping,
    StandardKey, UnmappedColumnPolicy, WarningEntry, WarningReason, WarningSink,
};
use anthro_transform::{CellContext, CellOutcome, canonicalize_cell};

use crate::config::SourceEntry;
use crate::redact::redact_value;

/// Output of the assembler, before outlier filtering.
#[derive(Debug, Clone, Default)]
pub struct CuratedDataset {
    pub records: Vec<MeasurementRecord>,
    /// Preserved unmapped values per record, aligned with `records`.
    pub preserved: Vec<BTreeMap<String, String>>,
    /// Preserved column names in order of first appearance.
    pub preserved_columns: Vec<String>,
    pub sources: Vec<SourceFacts>,
}

impl CuratedDataset {
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

pub struct Assembler<'o> {
    options: &'o CurationOptions,
    dataset: CuratedDataset,
    /// Subject id to the source that first produced it.
    subjects: BTreeMap<String, String>,
}

impl<'o> Assembler<'o> {
    pub fn new(options: &'o CurationOptions) -> Self {
        Self {
            options,
            dataset: CuratedDataset::default(),
            subjects: BTreeMap::new(),
        }
    }

    /// Map, canonicalize and append every row of one source table.
    ///
    /// Returns the number of warnings emitted for this source. Fails only on
    /// a missing subject id column or a duplicate subject id.
    pub fn add_source(
        &mut self,
        entry: &SourceEntry,
        table: &SourceTable,
        mapping: &SourceMapping,
        sha256: String,
        sink: &mut dyn WarningSink,
    ) -> Result<usize> {
        let mapper = ColumnMapper::new(mapping, self.options.unmapped_column_policy);
        let resolved = mapper.resolve(&table.headers);
        let id_index = match &entry.subject_id_column {
            Some(column) => Some(table.column_index(column).ok_or_else(|| {
                CurationError::config(format!(
                    "subject id column '{column}' not found in {}",
                    entry.file
                ))
            })?),
            None => None,
        };
        let unmapped = resolved.unmapped_names();
        if !unmapped.is_empty() {
            debug!(
                source = %entry.key,
                policy = mapper.policy().as_str(),
                columns = ?unmapped,
                "unmapped columns"
            );
        }

        let mut emitted = 0usize;
        for (row_index, cells) in table.rows.iter().enumerate() {
            let subject_id = id_index
                .map(|index| table.cell(row_index, index))
                .filter(|value| !is_missing_value(value))
                .map_or_else(|| synthetic_subject_id(&entry.key, row_index), str::to_string);
            if let Some(first) = self.subjects.get(&subject_id) {
                return Err(CurationError::DuplicateSubject {
                    subject_id,
                    first_source: first.clone(),
                    second_source: entry.key.clone(),
                });
            }
            self.subjects.insert(subject_id.clone(), entry.key.clone());

            let mut record =
                MeasurementRecord::new(subject_id, entry.key.as_str(), entry.file.as_str(), row_index);
            let mapped = mapper.map_cells(&resolved, cells);
            for (key, source) in &resolved.keys {
                let failure = match source {
                    KeySource::Column { mapping, .. } => {
                        let raw = mapped.values.get(key).map_or("", |value| value.raw);
                        let context = CellContext {
                            file: &entry.file,
                            column: &mapping.source_column_name,
                            declared_unit: mapping.unit.as_deref(),
                        };
                        match canonicalize_cell(raw, *key, context, self.options) {
                            CellOutcome::Value { value, provenance } => {
                                trace!(
                                    subject_id = %record.subject_id,
                                    key = %key,
                                    raw = redact_value(raw),
                                    value,
                                    "cell canonicalized"
                                );
                                record.set(*key, value, provenance);
                                continue;
                            }
                            CellOutcome::Failed { reason, details } => CellFailure {
                                column: Some(mapping.source_column_name.clone()),
                                reason,
                                original_value: (!raw.is_empty()).then(|| raw.to_string()),
                                details,
                            },
                        }
                    }
                    KeySource::ConfiguredButMissing { column } => CellFailure::not_present(
                        Some(column.clone()),
                        format!("configured column '{column}' not found in file header"),
                    ),
                    KeySource::DeclaredAbsent => {
                        CellFailure::not_present(None, "declared absent for this source")
                    }
                    KeySource::NotConfigured => {
                        CellFailure::not_present(None, "no column mapped for this source")
                    }
                };
                trace!(
                    subject_id = %record.subject_id,
                    key = %key,
                    reason = %failure.reason,
                    raw = redact_value(failure.original_value.as_deref().unwrap_or("")),
                    "cell set to NaN"
                );
                sink.record(failure.into_warning(&record, *key));
                emitted += 1;
            }

            if mapper.policy() == UnmappedColumnPolicy::PreservePrefixed {
                for name in mapped.preserved.keys() {
                    if !self.dataset.preserved_columns.contains(name) {
                        self.dataset.preserved_columns.push(name.clone());
                    }
                }
            }
            self.dataset.preserved.push(mapped.preserved);
            self.dataset.records.push(record);
        }

        info!(
            source = %entry.key,
            rows = table.row_count(),
            warnings = emitted,
            unmapped = unmapped.len(),
            "source assembled"
        );
        self.dataset.sources.push(SourceFacts {
            source: entry.key.clone(),
            file: entry.file.clone(),
            rows: table.row_count(),
            sha256,
            unmapped_columns: unmapped,
        });
        Ok(emitted)
    }

    pub fn finish(self) -> CuratedDataset {
        self.dataset
    }
}

/// `<source_key>-<row_number>`, 1-based and zero-padded to six digits.
pub fn synthetic_subject_id(source_key: &str, row_index: usize) -> String {
    format!("{source_key}-{:06}", row_index + 1)
}

struct CellFailure {
    column: Option<String>,
    reason: WarningReason,
    original_value: Option<String>,
    details: String,
}

impl CellFailure {
    fn not_present(column: Option<String>, details: impl Into<String>) -> Self {
        Self {
            column,
            reason: WarningReason::ColumnNotPresent,
            original_value: None,
            details: details.into(),
        }
    }

    fn into_warning(self, record: &MeasurementRecord, key: StandardKey) -> WarningEntry {
        WarningEntry {
            source: record.source.clone(),
            file: record.file.clone(),
            column: self.column,
            standard_key: Some(key),
            reason: self.reason,
            row_index: record.row_index,
            subject_id: record.subject_id.clone(),
            original_value: self.original_value,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anthro_map::parse_mapping_table;

    use super::*;

    const MAPPING: &str = r#"{
        "kr": {
            "HUMAN_ID": {"standard_key": null, "present": true},
            "나이": {"standard_key": "AGE_YR", "present": true},
            "키": {"standard_key": "HEIGHT_M", "present": true, "unit": "mm"},
            "허리둘레": {"standard_key": "WAIST_CIRC_M", "present": true, "unit": "cm"},
            "몸무게": {"standard_key": "WEIGHT_KG", "present": true},
            "엉덩이둘레": {"standard_key": "HIP_CIRC_M", "present": true},
            "목둘레": {"standard_key": "NECK_CIRC_M", "present": false}
        }
    }"#;

    fn table(rows: &[[&str; 5]]) -> SourceTable {
        SourceTable {
            path: PathBuf::from("raw.csv"),
            headers: ["HUMAN_ID", "나이", "키", "허리둘레", "몸무게"]
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        }
    }

    fn entry(id_column: Option<&str>) -> SourceEntry {
        SourceEntry {
            key: "kr".to_string(),
            file: "raw.csv".to_string(),
            path: PathBuf::from("raw.csv"),
            subject_id_column: id_column.map(str::to_string),
        }
    }

    #[test]
    fn every_cell_is_a_value_or_a_warning() {
        let mapping = parse_mapping_table(MAPPING).unwrap();
        let options = CurationOptions::default();
        let mut assembler = Assembler::new(&options);
        let mut warnings: Vec<WarningEntry> = Vec::new();
        let source = table(&[
            ["K1", "34", "1712", "80.25", "65.4"],
            ["K2", "NA", "abc", "", "70"],
        ]);
        assembler
            .add_source(
                &entry(Some("HUMAN_ID")),
                &source,
                mapping.source("kr").unwrap(),
                "00".to_string(),
                &mut warnings,
            )
            .unwrap();
        let dataset = assembler.finish();

        let first = &dataset.records[0];
        assert_eq!(first.subject_id, "K1");
        assert_eq!(first.present(StandardKey::HeightM), Some(1.712));
        assert_eq!(first.present(StandardKey::WaistCircM), Some(0.803));
        assert_eq!(first.present(StandardKey::WeightKg), Some(65.4));
        assert_eq!(first.present(StandardKey::AgeYr), Some(34.0));

        for record in &dataset.records {
            for key in StandardKey::ALL {
                let warned = warnings
                    .iter()
                    .filter(|w| w.row_index == record.row_index && w.standard_key == Some(key))
                    .count();
                let expected = usize::from(record.present(key).is_none());
                assert_eq!(warned, expected, "row {} key {key}", record.row_index);
            }
        }

        let height = warnings
            .iter()
            .find(|w| w.row_index == 1 && w.standard_key == Some(StandardKey::HeightM))
            .unwrap();
        assert_eq!(height.reason, WarningReason::UnitConversionFailed);
        assert_eq!(height.original_value.as_deref(), Some("abc"));
        assert_eq!(height.column.as_deref(), Some("키"));

        let waist = warnings
            .iter()
            .find(|w| w.row_index == 1 && w.standard_key == Some(StandardKey::WaistCircM))
            .unwrap();
        assert_eq!(waist.reason, WarningReason::ValueMissing);
        assert!(waist.original_value.is_none());

        let hip = warnings
            .iter()
            .find(|w| w.row_index == 0 && w.standard_key == Some(StandardKey::HipCircM))
            .unwrap();
        assert_eq!(hip.reason, WarningReason::ColumnNotPresent);
        assert_eq!(hip.column.as_deref(), Some("엉덩이둘레"));

        assert_eq!(dataset.sources[0].unmapped_columns, vec!["HUMAN_ID".to_string()]);
    }

    #[test]
    fn synthetic_ids_fill_blank_subject_cells() {
        let mapping = parse_mapping_table(MAPPING).unwrap();
        let options = CurationOptions::default();
        let mut assembler = Assembler::new(&options);
        let mut warnings: Vec<WarningEntry> = Vec::new();
        let source = table(&[["", "30", "1700", "80", "60"], ["K2", "30", "1700", "80", "60"]]);
        assembler
            .add_source(
                &entry(Some("HUMAN_ID")),
                &source,
                mapping.source("kr").unwrap(),
                "00".to_string(),
                &mut warnings,
            )
            .unwrap();
        let dataset = assembler.finish();
        assert_eq!(dataset.records[0].subject_id, "kr-000001");
        assert_eq!(dataset.records[1].subject_id, "K2");
    }

    #[test]
    fn missing_token_subject_ids_get_synthetic_ids() {
        let mapping = parse_mapping_table(MAPPING).unwrap();
        let options = CurationOptions::default();
        let mut assembler = Assembler::new(&options);
        let mut warnings: Vec<WarningEntry> = Vec::new();
        let source = table(&[
            ["NA", "30", "1700", "80", "60"],
            ["NA", "31", "1710", "81", "61"],
            ["-", "32", "1720", "82", "62"],
        ]);
        assembler
            .add_source(
                &entry(Some("HUMAN_ID")),
                &source,
                mapping.source("kr").unwrap(),
                "00".to_string(),
                &mut warnings,
            )
            .unwrap();
        let dataset = assembler.finish();
        let ids: Vec<&str> = dataset
            .records
            .iter()
            .map(|record| record.subject_id.as_str())
            .collect();
        assert_eq!(ids, vec!["kr-000001", "kr-000002", "kr-000003"]);
    }

    #[test]
    fn duplicate_subjects_are_fatal() {
        let mapping = parse_mapping_table(MAPPING).unwrap();
        let options = CurationOptions::default();
        let mut assembler = Assembler::new(&options);
        let mut warnings: Vec<WarningEntry> = Vec::new();
        let source = table(&[["K1", "30", "1700", "80", "60"], ["K1", "31", "1710", "81", "61"]]);
        let error = assembler
            .add_source(
                &entry(Some("HUMAN_ID")),
                &source,
                mapping.source("kr").unwrap(),
                "00".to_string(),
                &mut warnings,
            )
            .unwrap_err();
        assert!(matches!(
            error,
            CurationError::DuplicateSubject { ref subject_id, .. } if subject_id == "K1"
        ));
    }

    #[test]
    fn missing_subject_id_column_is_a_config_error() {
        let mapping = parse_mapping_table(MAPPING).unwrap();
        let options = CurationOptions::default();
        let mut assembler = Assembler::new(&options);
        let mut warnings: Vec<WarningEntry> = Vec::new();
        let source = table(&[["K1", "30", "1700", "80", "60"]]);
        let error = assembler
            .add_source(
                &entry(Some("ID")),
                &source,
                mapping.source("kr").unwrap(),
                "00".to_string(),
                &mut warnings,
            )
            .unwrap_err();
        assert!(matches!(error, CurationError::InvalidConfig { .. }));
    }

    #[test]
    fn preserve_policy_collects_unmapped_values() {
        let mapping = parse_mapping_table(MAPPING).unwrap();
        let options = CurationOptions {
            unmapped_column_policy: UnmappedColumnPolicy::PreservePrefixed,
            ..CurationOptions::default()
        };
        let mut assembler = Assembler::new(&options);
        let mut warnings: Vec<WarningEntry> = Vec::new();
        let source = table(&[["K1", "30", "1700", "80", "60"]]);
        assembler
            .add_source(
                &entry(None),
                &source,
                mapping.source("kr").unwrap(),
                "00".to_string(),
                &mut warnings,
            )
            .unwrap();
        let dataset = assembler.finish();
        assert_eq!(dataset.records[0].subject_id, "kr-000001");
        assert_eq!(dataset.preserved_columns, vec!["ko__HUMAN_ID__unmapped".to_string()]);
        assert_eq!(dataset.preserved[0]["ko__HUMAN_ID__unmapped"], "K1");
    }
}
