//! Curation pipeline: ingest, map, canonicalize, assemble, filter, frame.
//!
//! Loading happens up front so that every fatal configuration or I/O problem
//! surfaces before any data is transformed. Nothing here writes files.

use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span};

use anthro_ingest::{SourceTable, file_sha256, read_source_table};
use anthro_map::load_mapping_table;
use anthro_model::{CurationError, CurationOptions, MappingTable};
use anthro_transform::{KeyOutlierReport, filter_outliers};

use crate::assembler::{Assembler, CuratedDataset};
use crate::config::{RunConfig, SourceEntry};
use crate::frame::{build_curated_frame, build_unmapped_frame};
use crate::tracker::WarningTracker;

/// A source table read from disk, with its fingerprint.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub entry: SourceEntry,
    pub table: SourceTable,
    pub sha256: String,
}

/// Everything a run produced, ready for reporting.
#[derive(Debug, Clone)]
pub struct CurationOutcome {
    pub dataset: CuratedDataset,
    /// `SUBJECT_ID` plus every standard key.
    pub curated: DataFrame,
    /// Preserved unmapped columns, when the policy keeps them.
    pub unmapped: Option<DataFrame>,
    pub warnings: WarningTracker,
    pub outliers: Vec<KeyOutlierReport>,
}

impl CurationOutcome {
    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }
}

/// Load the mapping table and every configured source, then curate.
pub fn run_curation(config: &RunConfig) -> Result<CurationOutcome> {
    let span = info_span!("curation", sources = config.sources.len());
    let _guard = span.enter();

    let load_start = Instant::now();
    let mapping = load_mapping_table(&config.mapping_path)
        .with_context(|| format!("load mapping table {}", config.mapping_path.display()))?;
    config.check_sources(&mapping)?;
    let sources = load_sources(config)?;
    info!(
        sources = sources.len(),
        rows = sources.iter().map(|source| source.table.row_count()).sum::<usize>(),
        duration_ms = load_start.elapsed().as_millis(),
        "inputs loaded"
    );

    curate(&mapping, &sources, &config.options)
}

/// Read and fingerprint every configured source file.
pub fn load_sources(config: &RunConfig) -> Result<Vec<LoadedSource>> {
    let delimiter = config.delimiter();
    config
        .sources
        .iter()
        .map(|entry| {
            let table = read_source_table(&entry.path, delimiter)
                .with_context(|| format!("read source '{}'", entry.key))?;
            let sha256 = file_sha256(&entry.path)
                .with_context(|| format!("fingerprint {}", entry.path.display()))?;
            Ok(LoadedSource {
                entry: entry.clone(),
                table,
                sha256,
            })
        })
        .collect()
}

/// Curate already-loaded sources.
pub fn curate(
    mapping: &MappingTable,
    sources: &[LoadedSource],
    options: &CurationOptions,
) -> Result<CurationOutcome> {
    options.validate()?;
    let mut warnings = WarningTracker::new();

    let assemble_start = Instant::now();
    let mut assembler = Assembler::new(options);
    for source in sources {
        let span = info_span!("source", source = %source.entry.key, file = %source.entry.file);
        let _guard = span.enter();
        let source_mapping = mapping.source(&source.entry.key).ok_or_else(|| {
            CurationError::schema(format!(
                "source '{}' is not defined in the mapping table",
                source.entry.key
            ))
        })?;
        assembler.add_source(
            &source.entry,
            &source.table,
            source_mapping,
            source.sha256.clone(),
            &mut warnings,
        )?;
    }
    let mut dataset = assembler.finish();
    info!(
        rows = dataset.row_count(),
        warnings = warnings.len(),
        duration_ms = assemble_start.elapsed().as_millis(),
        "dataset assembled"
    );

    let filter_start = Instant::now();
    let outliers = {
        let span = info_span!("outliers", threshold = options.zscore_threshold);
        let _guard = span.enter();
        filter_outliers(&mut dataset.records, options, &mut warnings)
    };
    info!(
        removed = outliers.iter().map(|report| report.removed).sum::<usize>(),
        duration_ms = filter_start.elapsed().as_millis(),
        "outlier filter applied"
    );
    for (reason, count) in warnings.reason_counts() {
        debug!(reason = %reason, count, "warnings by reason");
    }

    let curated = build_curated_frame(&dataset.records)?;
    let unmapped = build_unmapped_frame(&dataset)?;
    Ok(CurationOutcome {
        dataset,
        curated,
        unmapped,
        warnings,
        outliers,
    })
}
