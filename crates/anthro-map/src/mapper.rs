//! Column Mapper: raw column names to standard keys, exact match only.
//!
//! A column is looked up verbatim in the source's mapping. There is no case
//! folding, trimming or fuzzy matching; a column the table does not name is
//! unmapped. Columns declared `present: false` are excluded silently.

use std::collections::BTreeMap;

use tracing::debug;

use anthro_model::{
    ColumnMapping, SourceMapping, StandardKey, UnmappedColumnPolicy, preserved_column_name,
};

/// What the mapper does with one raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDecision<'m> {
    /// Feeds a standard key.
    Mapped(StandardKey, &'m ColumnMapping),
    /// Declared absent in the mapping table; excluded without a warning.
    DeclaredAbsent,
    /// Not named by the table, or named with a null target.
    Unmapped,
}

/// How a standard key is sourced from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource<'m> {
    /// Read from the header column at `index`.
    Column {
        index: usize,
        mapping: &'m ColumnMapping,
    },
    /// A present column is configured but the file has no such header.
    ConfiguredButMissing { column: String },
    /// Declared absent for this source.
    DeclaredAbsent,
    /// No column of this source feeds the key.
    NotConfigured,
}

/// Header-level mapping of one source file.
#[derive(Debug, Clone)]
pub struct ResolvedColumns<'m> {
    pub keys: BTreeMap<StandardKey, KeySource<'m>>,
    /// Header columns that map to nothing, with their index.
    pub unmapped: Vec<(usize, String)>,
}

impl ResolvedColumns<'_> {
    pub fn unmapped_names(&self) -> Vec<String> {
        self.unmapped.iter().map(|(_, name)| name.clone()).collect()
    }
}

/// One mapped raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedValue<'r, 'm> {
    pub mapping: &'m ColumnMapping,
    pub raw: &'r str,
}

/// Output of mapping one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRow<'r, 'm> {
    pub values: BTreeMap<StandardKey, MappedValue<'r, 'm>>,
    /// `ko__<name>__unmapped` → raw value; empty under the drop policy.
    pub preserved: BTreeMap<String, String>,
}

pub struct ColumnMapper<'m> {
    mapping: &'m SourceMapping,
    policy: UnmappedColumnPolicy,
}

impl<'m> ColumnMapper<'m> {
    pub fn new(mapping: &'m SourceMapping, policy: UnmappedColumnPolicy) -> Self {
        Self { mapping, policy }
    }

    pub fn policy(&self) -> UnmappedColumnPolicy {
        self.policy
    }

    pub fn decide(&self, column: &str) -> ColumnDecision<'m> {
        match self.mapping.lookup(column) {
            Some(mapping) if !mapping.present => ColumnDecision::DeclaredAbsent,
            Some(mapping) => match mapping.standard_key {
                Some(key) => ColumnDecision::Mapped(key, mapping),
                None => ColumnDecision::Unmapped,
            },
            None => ColumnDecision::Unmapped,
        }
    }

    /// Map a row given as raw column name to raw value.
    pub fn map_row<'r>(&self, row: &'r BTreeMap<String, String>) -> MappedRow<'r, 'm> {
        let mut mapped = MappedRow::default();
        for (column, raw) in row {
            match self.decide(column) {
                ColumnDecision::Mapped(key, mapping) => {
                    mapped.values.insert(
                        key,
                        MappedValue {
                            mapping,
                            raw: raw.as_str(),
                        },
                    );
                }
                ColumnDecision::DeclaredAbsent => {}
                ColumnDecision::Unmapped => {
                    if self.policy == UnmappedColumnPolicy::PreservePrefixed {
                        mapped
                            .preserved
                            .insert(preserved_column_name(column), raw.clone());
                    }
                }
            }
        }
        mapped
    }

    /// Resolve every standard key against a file header.
    pub fn resolve(&self, headers: &[String]) -> ResolvedColumns<'m> {
        let mut keys = BTreeMap::new();
        let mut unmapped = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            match self.decide(header) {
                ColumnDecision::Mapped(key, mapping) => {
                    keys.entry(key)
                        .or_insert(KeySource::Column { index, mapping });
                }
                ColumnDecision::DeclaredAbsent => {}
                ColumnDecision::Unmapped => {
                    if !header.is_empty() {
                        unmapped.push((index, header.clone()));
                    }
                }
            }
        }
        for key in StandardKey::ALL {
            if keys.contains_key(&key) {
                continue;
            }
            let source = if let Some(mapping) = self.mapping.column_for(key) {
                KeySource::ConfiguredButMissing {
                    column: mapping.source_column_name.clone(),
                }
            } else if self.mapping.declares_absent(key) {
                KeySource::DeclaredAbsent
            } else {
                KeySource::NotConfigured
            };
            keys.insert(key, source);
        }
        debug!(
            source = %self.mapping.source_key,
            mapped = keys
                .values()
                .filter(|source| matches!(source, KeySource::Column { .. }))
                .count(),
            unmapped = unmapped.len(),
            "columns resolved"
        );
        ResolvedColumns { keys, unmapped }
    }

    /// Map a positional row using a header resolution.
    pub fn map_cells<'r>(
        &self,
        resolved: &ResolvedColumns<'m>,
        cells: &'r [String],
    ) -> MappedRow<'r, 'm> {
        let mut mapped = MappedRow::default();
        for (key, source) in &resolved.keys {
            if let KeySource::Column { index, mapping } = source {
                let raw = cells.get(*index).map(String::as_str).unwrap_or("");
                mapped.values.insert(
                    *key,
                    MappedValue {
                        mapping: *mapping,
                        raw,
                    },
                );
            }
        }
        if self.policy == UnmappedColumnPolicy::PreservePrefixed {
            for (index, name) in &resolved.unmapped {
                let raw = cells.get(*index).cloned().unwrap_or_default();
                mapped.preserved.insert(preserved_column_name(name), raw);
            }
        }
        mapped
    }
}
