//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use anthro_cli::types::RunRequest;
use anthro_core::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "anthro-curate",
    version,
    about = "Build a curated anthropometric dataset from raw survey tables",
    long_about = "Map raw survey columns to the standard key set, canonicalize units to \
                  meters and kilograms, remove z-score outliers inside an age band, and \
                  write the curated table with per-cell warnings and a facts summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw cell values in trace-level logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the curation pipeline described by a TOML configuration.
    Run(RunArgs),

    /// List the standard keys with their kind and canonical unit.
    Keys,

    /// Validate a mapping table and show per-source column counts.
    CheckMapping(CheckMappingArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to the run configuration (TOML).
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output directory (default: from the configuration).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run everything and report, but write no files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Lower bound of the outlier age band, in years.
    #[arg(long = "age-min", value_name = "YEARS")]
    pub age_min: Option<f64>,

    /// Upper bound of the outlier age band, in years.
    #[arg(long = "age-max", value_name = "YEARS")]
    pub age_max: Option<f64>,

    /// Z-score threshold for outlier removal.
    #[arg(long = "zscore", value_name = "K")]
    pub zscore: Option<f64>,

    /// Number of warning groups kept in the facts summary.
    #[arg(long = "top-n", value_name = "N")]
    pub top_n: Option<usize>,

    /// Keep unmapped columns as ko__<name>__unmapped in a sidecar table.
    #[arg(long = "preserve-unmapped")]
    pub preserve_unmapped: bool,
}

impl RunArgs {
    pub fn to_request(&self) -> RunRequest {
        RunRequest {
            config: self.config.clone(),
            dry_run: self.dry_run,
            overrides: ConfigOverrides {
                output_dir: self.output_dir.clone(),
                age_band_min: self.age_min,
                age_band_max: self.age_max,
                zscore_threshold: self.zscore,
                warnings_top_n: self.top_n,
                preserve_unmapped: self.preserve_unmapped,
            },
        }
    }
}

#[derive(Args)]
pub struct CheckMappingArgs {
    /// Path to the mapping table (JSON).
    #[arg(value_name = "MAPPING")]
    pub mapping: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_become_overrides() {
        let cli = Cli::parse_from([
            "anthro-curate",
            "run",
            "curate.toml",
            "--age-min",
            "25",
            "--zscore",
            "2.5",
            "--top-n",
            "5",
            "--preserve-unmapped",
            "--dry-run",
        ]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let request = args.to_request();
        assert!(request.dry_run);
        assert_eq!(request.overrides.age_band_min, Some(25.0));
        assert_eq!(request.overrides.age_band_max, None);
        assert_eq!(request.overrides.zscore_threshold, Some(2.5));
        assert_eq!(request.overrides.warnings_top_n, Some(5));
        assert!(request.overrides.preserve_unmapped);
    }
}
