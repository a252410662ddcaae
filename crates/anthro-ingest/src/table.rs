use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// A raw source table: header names and string cells, in file order.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub path: PathBuf,
    pub headers: Vec<String>,
    /// Data rows, each padded or truncated to `headers.len()`.
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    /// Exact, case-sensitive header lookup. The first match wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_matches('\u{feff}').trim().to_string()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a delimited source file. The first non-blank record is the header.
pub fn read_source_table(path: &Path, delimiter: u8) -> Result<SourceTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|error| csv_error(path, &error))?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| csv_error(path, &error))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match &headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(names) => {
                let mut row = Vec::with_capacity(names.len());
                for idx in 0..names.len() {
                    row.push(record.get(idx).map(normalize_cell).unwrap_or_default());
                }
                rows.push(row);
            }
        }
    }
    let headers = headers.ok_or_else(|| IngestError::MissingHeader {
        path: path.to_path_buf(),
    })?;

    let mut seen = BTreeSet::new();
    for header in &headers {
        if !header.is_empty() && !seen.insert(header.as_str()) {
            warn!(
                path = %path.display(),
                column = %header,
                "duplicate header; only the first occurrence is mapped"
            );
        }
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "source table read"
    );
    Ok(SourceTable {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
