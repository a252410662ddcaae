//! Facts summary and artifact rendering for curated datasets.

pub mod facts;
pub mod markdown;
pub mod writers;

pub use facts::{SummaryContext, column_facts, nan_percent, summarize, top_warnings};
pub use markdown::render_facts_markdown;
pub use writers::{
    ArtifactSet, CURATED_FILE, FACTS_JSON_FILE, FACTS_MARKDOWN_FILE, UNMAPPED_FILE, WARNINGS_FILE,
    format_curated_frame, format_curated_value, render_artifacts, render_csv, render_facts_json,
    render_warnings_jsonl, write_artifacts,
};
