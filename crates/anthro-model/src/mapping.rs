//! Column mapping tables: raw source column name to standard key.
//!
//! The serialized form is
//! `{source_key: {column: {standard_key: string|null, present: bool, unit?: string}}}`.
//! [`MappingTable::from_raw`] validates it against the fixed key set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CurationError, Result};
use crate::key::StandardKey;

/// One column entry as written in the mapping document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumnEntry {
    pub standard_key: Option<String>,
    pub present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// The mapping document before validation.
pub type RawMappingTable = BTreeMap<String, BTreeMap<String, RawColumnEntry>>;

/// A validated mapping for one source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    pub source_key: String,
    pub source_column_name: String,
    pub standard_key: Option<StandardKey>,
    pub present: bool,
    /// Declared raw unit, unparsed. Unsupported units fail per cell.
    pub unit: Option<String>,
}

impl ColumnMapping {
    /// Whether values of this column flow into a standard key.
    pub fn target(&self) -> Option<StandardKey> {
        if self.present { self.standard_key } else { None }
    }
}

/// All column mappings of one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMapping {
    pub source_key: String,
    pub columns: BTreeMap<String, ColumnMapping>,
}

impl SourceMapping {
    /// Exact, case-sensitive lookup of a raw column name.
    pub fn lookup(&self, column: &str) -> Option<&ColumnMapping> {
        self.columns.get(column)
    }

    /// The present column feeding `key`, if one is configured.
    pub fn column_for(&self, key: StandardKey) -> Option<&ColumnMapping> {
        self.columns
            .values()
            .find(|mapping| mapping.target() == Some(key))
    }

    /// True when the table declares `key` as absent from this source.
    pub fn declares_absent(&self, key: StandardKey) -> bool {
        self.columns
            .values()
            .any(|mapping| !mapping.present && mapping.standard_key == Some(key))
    }

    pub fn mapped_keys(&self) -> Vec<StandardKey> {
        let mut keys: Vec<StandardKey> = self
            .columns
            .values()
            .filter_map(ColumnMapping::target)
            .collect();
        keys.sort();
        keys
    }
}

/// Validated mapping table for every configured source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingTable {
    pub sources: BTreeMap<String, SourceMapping>,
}

impl MappingTable {
    /// Validate a raw mapping document.
    ///
    /// Fails with [`CurationError::SchemaViolation`] when an entry names an
    /// undefined standard key or two present columns of one source target
    /// the same key.
    pub fn from_raw(raw: RawMappingTable) -> Result<Self> {
        let mut sources = BTreeMap::new();
        for (source_key, columns) in raw {
            let mut mapped: BTreeMap<String, ColumnMapping> = BTreeMap::new();
            let mut targets: BTreeMap<StandardKey, String> = BTreeMap::new();
            for (column, entry) in columns {
                let standard_key = match entry.standard_key.as_deref() {
                    Some(name) => Some(name.parse::<StandardKey>().map_err(|_| {
                        CurationError::schema(format!(
                            "source '{source_key}' column '{column}' references undefined standard key '{name}'"
                        ))
                    })?),
                    None => None,
                };
                if entry.present
                    && let Some(key) = standard_key
                    && let Some(previous) = targets.insert(key, column.clone())
                {
                    return Err(CurationError::schema(format!(
                        "source '{source_key}' maps both '{previous}' and '{column}' to {key}"
                    )));
                }
                mapped.insert(
                    column.clone(),
                    ColumnMapping {
                        source_key: source_key.clone(),
                        source_column_name: column,
                        standard_key,
                        present: entry.present,
                        unit: entry.unit,
                    },
                );
            }
            sources.insert(
                source_key.clone(),
                SourceMapping {
                    source_key,
                    columns: mapped,
                },
            );
        }
        Ok(Self { sources })
    }

    pub fn source(&self, source_key: &str) -> Option<&SourceMapping> {
        self.sources.get(source_key)
    }

    pub fn source_keys(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}
