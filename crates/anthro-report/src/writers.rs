//! Curation artifacts: rendered in memory, then written together.
//!
//! Rendering never touches the filesystem, so a dry run renders the same
//! bytes and skips [`write_artifacts`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{Column, CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use tracing::info;

use anthro_core::CurationOutcome;
use anthro_ingest::sha256_hex;
use anthro_model::{
    CurationOptions, FactsSummary, MeasurementKind, SUBJECT_ID_COLUMN, StandardKey, WarningEntry,
};

use crate::facts::{SummaryContext, summarize};
use crate::markdown::render_facts_markdown;

pub const CURATED_FILE: &str = "curated.csv";
pub const UNMAPPED_FILE: &str = "curated_unmapped.csv";
pub const WARNINGS_FILE: &str = "warnings.jsonl";
pub const FACTS_JSON_FILE: &str = "facts_summary.json";
pub const FACTS_MARKDOWN_FILE: &str = "facts_summary.md";

/// Decimal places written for curated lengths.
const LENGTH_DECIMALS: usize = 3;

const NAN_TEXT: &str = "NaN";

/// Every output of a run, rendered.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub summary: FactsSummary,
    pub curated_csv: Vec<u8>,
    pub unmapped_csv: Option<Vec<u8>>,
    pub warnings_jsonl: Vec<u8>,
    pub facts_json: Vec<u8>,
    pub facts_markdown: String,
}

impl ArtifactSet {
    /// Artifact file names paired with their bytes, in write order.
    pub fn files(&self) -> Vec<(&'static str, &[u8])> {
        let mut files = vec![(CURATED_FILE, self.curated_csv.as_slice())];
        if let Some(unmapped) = &self.unmapped_csv {
            files.push((UNMAPPED_FILE, unmapped.as_slice()));
        }
        files.push((WARNINGS_FILE, self.warnings_jsonl.as_slice()));
        files.push((FACTS_JSON_FILE, self.facts_json.as_slice()));
        files.push((FACTS_MARKDOWN_FILE, self.facts_markdown.as_bytes()));
        files
    }
}

/// Render a frame as CSV with a header row.
pub fn render_csv(frame: &DataFrame) -> Result<Vec<u8>> {
    let mut frame = frame.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)
        .context("render csv")?;
    Ok(buffer)
}

/// Text form of one curated value.
///
/// Lengths carry exactly three decimals. Mass and age keep their native
/// resolution in shortest round-trip form.
pub fn format_curated_value(key: StandardKey, value: f64) -> String {
    if value.is_nan() {
        return NAN_TEXT.to_string();
    }
    match key.kind() {
        MeasurementKind::Length => format!("{value:.prec$}", prec = LENGTH_DECIMALS),
        MeasurementKind::Mass | MeasurementKind::Age => value.to_string(),
    }
}

/// Curated frame with every key column replaced by its written text.
pub fn format_curated_frame(curated: &DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(curated.width());
    columns.push(
        curated
            .column(SUBJECT_ID_COLUMN)
            .context("curated subject id column")?
            .clone(),
    );
    for key in StandardKey::ALL {
        let values = curated
            .column(key.as_str())
            .with_context(|| format!("curated column {key}"))?
            .f64()
            .with_context(|| format!("curated column {key} is not Float64"))?;
        let text: Vec<String> = values
            .into_iter()
            .map(|value| format_curated_value(key, value.unwrap_or(f64::NAN)))
            .collect();
        columns.push(Series::new(key.as_str().into(), text).into());
    }
    DataFrame::new(columns).context("format curated frame")
}

/// One JSON object per line, in emission order.
pub fn render_warnings_jsonl(warnings: &[WarningEntry]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    for entry in warnings {
        serde_json::to_writer(&mut buffer, entry).context("serialize warning")?;
        buffer.push(b'\n');
    }
    Ok(buffer)
}

pub fn render_facts_json(summary: &FactsSummary) -> Result<Vec<u8>> {
    let mut buffer = serde_json::to_vec_pretty(summary).context("serialize facts summary")?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Render every artifact of a finished run.
pub fn render_artifacts(outcome: &CurationOutcome, options: &CurationOptions) -> Result<ArtifactSet> {
    let curated_csv = render_csv(&format_curated_frame(&outcome.curated)?)?;
    let curated_sha256 = sha256_hex(&curated_csv);
    let unmapped_csv = outcome
        .unmapped
        .as_ref()
        .map(render_csv)
        .transpose()?;
    let summary = summarize(
        &outcome.curated,
        SummaryContext {
            warnings: outcome.warnings.entries(),
            sources: &outcome.dataset.sources,
            options,
            curated_sha256: Some(&curated_sha256),
        },
    )?;
    Ok(ArtifactSet {
        warnings_jsonl: render_warnings_jsonl(outcome.warnings.entries())?,
        facts_json: render_facts_json(&summary)?,
        facts_markdown: render_facts_markdown(&summary),
        summary,
        curated_csv,
        unmapped_csv,
    })
}

/// Write every artifact into `output_dir`, creating it if needed.
pub fn write_artifacts(output_dir: &Path, artifacts: &ArtifactSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let mut written = Vec::new();
    for (name, bytes) in artifacts.files() {
        let path = output_dir.join(name);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "artifact written");
        written.push(path);
    }
    Ok(written)
}
