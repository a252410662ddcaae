use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use anthro_core::{RunConfig, run_curation};
use anthro_map::{MappingOverview, load_mapping_table, overview};
use anthro_model::{MeasurementKind, StandardKey};
use anthro_report::{render_artifacts, write_artifacts};

use crate::types::{RunRequest, RunResult};

/// Load the configuration, curate, and write artifacts unless dry-running.
pub fn run_curate(request: &RunRequest) -> Result<RunResult> {
    let mut config = RunConfig::load(&request.config)
        .with_context(|| format!("load configuration {}", request.config.display()))?;
    config.apply_overrides(&request.overrides)?;

    let span = info_span!("run", config = %request.config.display(), dry_run = request.dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    let outcome = run_curation(&config)?;
    let render_start = Instant::now();
    let artifacts = render_artifacts(&outcome, &config.options)?;
    info!(
        rows = artifacts.summary.total_rows,
        warnings = artifacts.summary.total_warnings,
        duration_ms = render_start.elapsed().as_millis(),
        "artifacts rendered"
    );

    let written = if request.dry_run {
        info!(output_dir = %config.output_dir.display(), "dry run: nothing written");
        Vec::new()
    } else {
        write_artifacts(&config.output_dir, &artifacts)?
    };
    info!(duration_ms = start.elapsed().as_millis(), "run complete");

    Ok(RunResult {
        output_dir: config.output_dir,
        dry_run: request.dry_run,
        written,
        outliers_removed: outcome.outliers.iter().map(|report| report.removed).sum(),
        summary: artifacts.summary,
    })
}

/// One row of the `keys` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRow {
    pub key: StandardKey,
    pub kind: MeasurementKind,
    pub canonical_unit: &'static str,
    pub outlier_filtered: bool,
}

pub fn key_rows() -> Vec<KeyRow> {
    StandardKey::ALL
        .iter()
        .map(|key| KeyRow {
            key: *key,
            kind: key.kind(),
            canonical_unit: key.canonical_unit().as_str(),
            outlier_filtered: key.is_filterable(),
        })
        .collect()
}

/// Validate a mapping table and count its columns per source.
pub fn check_mapping(path: &Path) -> Result<Vec<MappingOverview>> {
    let table = load_mapping_table(path)
        .with_context(|| format!("load mapping table {}", path.display()))?;
    let overviews = overview(&table);
    info!(sources = overviews.len(), "mapping table valid");
    Ok(overviews)
}
