//! Curated polars frames.
//!
//! The curated frame is `SUBJECT_ID` followed by every standard key as a
//! Float64 column; missing values are NaN, never null.

use anyhow::{Context, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use anthro_model::{CurationError, MeasurementRecord, SUBJECT_ID_COLUMN, StandardKey};

use crate::assembler::CuratedDataset;

/// Build the curated frame from subject records.
pub fn build_curated_frame(records: &[MeasurementRecord]) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(StandardKey::ALL.len() + 1);
    let ids: Vec<&str> = records
        .iter()
        .map(|record| record.subject_id.as_str())
        .collect();
    columns.push(Series::new(SUBJECT_ID_COLUMN.into(), ids).into());
    for key in StandardKey::ALL {
        let values: Vec<f64> = records.iter().map(|record| record.value(key)).collect();
        columns.push(Series::new(key.as_str().into(), values).into());
    }
    let frame = DataFrame::new(columns).context("build curated frame")?;
    ensure_curated_schema(&frame)?;
    Ok(frame)
}

/// Fail with a schema violation unless the frame holds exactly the curated columns.
pub fn ensure_curated_schema(frame: &DataFrame) -> std::result::Result<(), CurationError> {
    let expected = StandardKey::curated_columns();
    let actual: Vec<&str> = frame
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    if actual == expected {
        return Ok(());
    }
    let missing: Vec<&str> = expected
        .iter()
        .filter(|name| !actual.iter().any(|column| column == *name))
        .copied()
        .collect();
    let extra: Vec<&str> = actual
        .iter()
        .filter(|name| !expected.iter().any(|column| column == *name))
        .copied()
        .collect();
    Err(CurationError::schema(format!(
        "curated table columns differ from the standard key set (missing: {missing:?}, unexpected: {extra:?})"
    )))
}

/// Sidecar frame of preserved unmapped columns, keyed by `SUBJECT_ID`.
///
/// Returns `None` when nothing was preserved.
pub fn build_unmapped_frame(dataset: &CuratedDataset) -> Result<Option<DataFrame>> {
    if dataset.preserved_columns.is_empty() {
        return Ok(None);
    }
    let mut columns: Vec<Column> = Vec::with_capacity(dataset.preserved_columns.len() + 1);
    let ids: Vec<&str> = dataset
        .records
        .iter()
        .map(|record| record.subject_id.as_str())
        .collect();
    columns.push(Series::new(SUBJECT_ID_COLUMN.into(), ids).into());
    for name in &dataset.preserved_columns {
        let values: Vec<&str> = dataset
            .preserved
            .iter()
            .map(|row| row.get(name).map_or("", String::as_str))
            .collect();
        columns.push(Series::new(name.as_str().into(), values).into());
    }
    let frame = DataFrame::new(columns).context("build unmapped column frame")?;
    Ok(Some(frame))
}
