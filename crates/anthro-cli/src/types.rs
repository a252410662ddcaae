use std::path::PathBuf;

use anthro_core::ConfigOverrides;
use anthro_model::FactsSummary;

/// A `run` invocation after argument parsing.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub config: PathBuf,
    pub overrides: ConfigOverrides,
    pub dry_run: bool,
}

/// Outcome of a successful `run`.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub output_dir: PathBuf,
    pub dry_run: bool,
    /// Artifact paths; empty for a dry run.
    pub written: Vec<PathBuf>,
    pub summary: FactsSummary,
    pub outliers_removed: usize,
}
