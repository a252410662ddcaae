//! Human-readable facts report.

use anthro_model::{FactsSummary, StandardKey};

use crate::writers::format_curated_value;

const NONE_MARK: &str = "—";

/// Statistic in the same text form as the curated table.
fn statistic(key: StandardKey, value: Option<f64>) -> String {
    value.map_or_else(|| NONE_MARK.to_string(), |v| format_curated_value(key, v))
}

/// Render a facts summary as Markdown tables.
pub fn render_facts_markdown(summary: &FactsSummary) -> String {
    let options = &summary.options;
    let mut lines = vec![
        "# Curated dataset facts".to_string(),
        String::new(),
        format!("- rows: {}", summary.total_rows),
        format!("- warnings: {}", summary.total_warnings),
        format!(
            "- curated sha256: {}",
            summary.curated_sha256.as_deref().unwrap_or(NONE_MARK)
        ),
        format!(
            "- age band: {} to {} years",
            options.age_band_min, options.age_band_max
        ),
        format!("- z-score threshold: {}", options.zscore_threshold),
        format!(
            "- unmapped columns: {}",
            options.unmapped_column_policy.as_str()
        ),
        String::new(),
        "## Sources".to_string(),
        String::new(),
        "| source | file | rows | sha256 | unmapped columns |".to_string(),
        "|---|---|---:|---|---|".to_string(),
    ];
    for source in &summary.sources {
        let unmapped = if source.unmapped_columns.is_empty() {
            NONE_MARK.to_string()
        } else {
            source.unmapped_columns.join(", ")
        };
        lines.push(format!(
            "| {} | {} | {} | `{}` | {} |",
            source.source, source.file, source.rows, source.sha256, unmapped
        ));
    }

    lines.extend([
        String::new(),
        "## Columns".to_string(),
        String::new(),
        "| key | count | nan | nan_pct | min | median | max |".to_string(),
        "|---|---:|---:|---:|---:|---:|---:|".to_string(),
    ]);
    for column in &summary.columns {
        lines.push(format!(
            "| {} | {} | {} | {:.1} | {} | {} | {} |",
            column.key,
            column.count,
            column.nan,
            column.nan_pct,
            statistic(column.key, column.min),
            statistic(column.key, column.median),
            statistic(column.key, column.max)
        ));
    }

    lines.extend([
        String::new(),
        format!("## Warnings top {}", options.warnings_top_n),
        String::new(),
    ]);
    if summary.warnings_top_n.is_empty() {
        lines.push("No warnings.".to_string());
    } else {
        lines.push("| # | standard_key | reason | count |".to_string());
        lines.push("|---:|---|---|---:|".to_string());
        for (rank, group) in summary.warnings_top_n.iter().enumerate() {
            let key = group
                .standard_key
                .map_or_else(|| NONE_MARK.to_string(), |key| key.to_string());
            lines.push(format!(
                "| {} | {} | {} | {} |",
                rank + 1,
                key,
                group.reason,
                group.count
            ));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
