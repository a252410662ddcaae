pub mod cell;
pub mod error;
pub mod fingerprint;
pub mod table;

pub use cell::{MISSING_TOKENS, RawCell, classify_cell, is_missing_value};
pub use error::{IngestError, Result};
pub use fingerprint::{file_sha256, sha256_hex};
pub use table::{SourceTable, read_source_table};
