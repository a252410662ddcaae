//! Facts Summarizer.
//!
//! Statistics are read back from the curated frame, so the report describes
//! exactly what was written. Null and NaN cells both count as missing.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;

use anthro_model::{
    ColumnFacts, CurationOptions, FactsSummary, SourceFacts, StandardKey, WarningEntry,
    WarningGroup, WarningReason,
};
use anthro_transform::round_half_up;

/// Inputs of a facts summary besides the curated frame.
#[derive(Debug, Clone, Copy)]
pub struct SummaryContext<'a> {
    pub warnings: &'a [WarningEntry],
    pub sources: &'a [SourceFacts],
    pub options: &'a CurationOptions,
    pub curated_sha256: Option<&'a str>,
}

/// Summarize a curated frame and its warnings.
pub fn summarize(curated: &DataFrame, context: SummaryContext<'_>) -> Result<FactsSummary> {
    let mut columns = Vec::with_capacity(StandardKey::ALL.len());
    for key in StandardKey::ALL {
        let column = curated
            .column(key.as_str())
            .with_context(|| format!("curated column {key}"))?;
        let values = column
            .f64()
            .with_context(|| format!("curated column {key} is not Float64"))?;
        let cells: Vec<f64> = values
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect();
        columns.push(column_facts(key, &cells));
    }
    Ok(FactsSummary {
        total_rows: curated.height(),
        total_warnings: context.warnings.len(),
        columns,
        warnings_top_n: top_warnings(context.warnings, context.options.warnings_top_n),
        sources: context.sources.to_vec(),
        curated_sha256: context.curated_sha256.map(str::to_string),
        options: context.options.clone(),
    })
}

/// Count, NaN count, NaN percentage and min/median/max of one column.
pub fn column_facts(key: StandardKey, cells: &[f64]) -> ColumnFacts {
    let mut present: Vec<f64> = cells.iter().copied().filter(|v| !v.is_nan()).collect();
    present.sort_by(f64::total_cmp);
    let count = present.len();
    let nan = cells.len() - count;
    ColumnFacts {
        key,
        count,
        nan,
        nan_pct: nan_percent(nan, cells.len()),
        min: present.first().copied(),
        median: median(&present),
        max: present.last().copied(),
    }
}

/// `100 * nan / total`, rounded half-up to one decimal. Zero for an empty column.
pub fn nan_percent(nan: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_half_up(100.0 * nan as f64 / total as f64, 0.1)
}

/// Median of sorted values; the mean of the two middle values for even counts.
fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Group warnings by `(standard_key, reason)` and keep the `n` largest groups.
///
/// Ties are ordered by standard key, then reason.
pub fn top_warnings(warnings: &[WarningEntry], n: usize) -> Vec<WarningGroup> {
    let mut counts: BTreeMap<(Option<StandardKey>, WarningReason), usize> = BTreeMap::new();
    for entry in warnings {
        *counts.entry(entry.group_key()).or_insert(0) += 1;
    }
    let mut groups: Vec<WarningGroup> = counts
        .into_iter()
        .map(|((standard_key, reason), count)| WarningGroup {
            standard_key,
            reason,
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap key order among equal counts.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(n);
    groups
}
