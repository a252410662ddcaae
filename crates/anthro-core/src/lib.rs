//! Curated dataset builder: warning tracking, assembly and run orchestration.

pub mod assembler;
pub mod config;
pub mod frame;
pub mod pipeline;
pub mod redact;
pub mod tracker;

pub use assembler::{Assembler, CuratedDataset, synthetic_subject_id};
pub use config::{ConfigOverrides, RunConfig, SourceEntry};
pub use frame::{build_curated_frame, build_unmapped_frame, ensure_curated_schema};
pub use pipeline::{CurationOutcome, LoadedSource, curate, load_sources, run_curation};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data_enabled};
pub use tracker::WarningTracker;
