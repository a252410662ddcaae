use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use anthro_cli::commands::KeyRow;
use anthro_cli::types::RunResult;
use anthro_map::MappingOverview;
use anthro_model::{ColumnFacts, StandardKey, WarningReason};
use anthro_report::format_curated_value;

pub fn print_run_summary(result: &RunResult) {
    let summary = &result.summary;
    if result.dry_run {
        println!("Dry run: no files written (output would go to {})", result.output_dir.display());
    } else {
        println!("Output: {}", result.output_dir.display());
        for path in &result.written {
            println!("  {}", path.display());
        }
    }
    println!(
        "Rows: {}  Warnings: {}  Outliers removed: {}",
        summary.total_rows, summary.total_warnings, result.outliers_removed
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Count"),
        header_cell("NaN"),
        header_cell("NaN %"),
        header_cell("Min"),
        header_cell("Median"),
        header_cell("Max"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in &summary.columns {
        table.add_row(column_row(column));
    }
    println!("{table}");

    if summary.warnings_top_n.is_empty() {
        println!("No warnings.");
        return;
    }
    let mut warnings = Table::new();
    warnings.set_header(vec![
        header_cell("#"),
        header_cell("Standard key"),
        header_cell("Reason"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut warnings);
    align_column(&mut warnings, 0, CellAlignment::Right);
    align_column(&mut warnings, 3, CellAlignment::Right);
    for (rank, group) in summary.warnings_top_n.iter().enumerate() {
        warnings.add_row(vec![
            Cell::new(rank + 1),
            group
                .standard_key
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(group.reason).fg(reason_color(group.reason)),
            Cell::new(group.count),
        ]);
    }
    println!("{warnings}");
}

pub fn print_keys(rows: &[KeyRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Standard key"),
        header_cell("Kind"),
        header_cell("Unit"),
        header_cell("Outlier filter"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.key).fg(Color::Cyan),
            Cell::new(row.kind.as_str()),
            Cell::new(row.canonical_unit),
            if row.outlier_filtered {
                Cell::new("yes")
            } else {
                dim_cell("no")
            },
        ]);
    }
    println!("{table}");
}

pub fn print_mapping_overview(overviews: &[MappingOverview]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Mapped"),
        header_cell("Unmapped"),
        header_cell("Absent"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for overview in overviews {
        table.add_row(vec![
            Cell::new(&overview.source_key).fg(Color::Cyan),
            Cell::new(overview.mapped),
            Cell::new(overview.unmapped),
            Cell::new(overview.absent),
        ]);
    }
    println!("{table}");
}

fn column_row(column: &ColumnFacts) -> Vec<Cell> {
    let nan_cell = if column.count == 0 {
        Cell::new(format!("{:.1}", column.nan_pct)).fg(Color::Red)
    } else if column.nan > 0 {
        Cell::new(format!("{:.1}", column.nan_pct)).fg(Color::Yellow)
    } else {
        Cell::new(format!("{:.1}", column.nan_pct))
    };
    vec![
        Cell::new(column.key),
        Cell::new(column.count),
        Cell::new(column.nan),
        nan_cell,
        value_cell(column.key, column.min),
        value_cell(column.key, column.median),
        value_cell(column.key, column.max),
    ]
}

fn value_cell(key: StandardKey, value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_curated_value(key, value)),
        None => dim_cell("-"),
    }
}

fn reason_color(reason: WarningReason) -> Color {
    match reason {
        WarningReason::ColumnNotPresent => Color::DarkGrey,
        WarningReason::ValueMissing => Color::Yellow,
        WarningReason::UnitConversionFailed => Color::Red,
        WarningReason::OutlierRemoved => Color::Magenta,
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}
