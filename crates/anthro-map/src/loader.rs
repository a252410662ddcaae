//! Loading mapping tables from JSON documents.

use std::fs;
use std::path::Path;

use serde::Serialize;

use anthro_model::{CurationError, MappingTable, RawMappingTable, Result, SourceMapping};

/// Load and validate a mapping table file.
pub fn load_mapping_table(path: &Path) -> Result<MappingTable> {
    let text = fs::read_to_string(path).map_err(|source| CurationError::io(path, source))?;
    let raw: RawMappingTable =
        serde_json::from_str(&text).map_err(|error| CurationError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
    MappingTable::from_raw(raw)
}

/// Parse and validate a mapping document held in memory.
pub fn parse_mapping_table(text: &str) -> Result<MappingTable> {
    let raw: RawMappingTable =
        serde_json::from_str(text).map_err(|error| CurationError::Parse {
            path: "<inline>".into(),
            message: error.to_string(),
        })?;
    MappingTable::from_raw(raw)
}

/// Column counts of one source mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingOverview {
    pub source_key: String,
    /// Present columns that feed a standard key.
    pub mapped: usize,
    /// Present columns with no standard key.
    pub unmapped: usize,
    /// Columns declared `present: false`.
    pub absent: usize,
}

impl MappingOverview {
    pub fn of(source: &SourceMapping) -> Self {
        let mut overview = Self {
            source_key: source.source_key.clone(),
            mapped: 0,
            unmapped: 0,
            absent: 0,
        };
        for mapping in source.columns.values() {
            match (mapping.present, mapping.standard_key) {
                (false, _) => overview.absent += 1,
                (true, Some(_)) => overview.mapped += 1,
                (true, None) => overview.unmapped += 1,
            }
        }
        overview
    }
}

pub fn overview(table: &MappingTable) -> Vec<MappingOverview> {
    table.sources.values().map(MappingOverview::of).collect()
}
