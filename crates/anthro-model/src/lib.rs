//! Data model for anthropometric dataset curation.

pub mod error;
pub mod facts;
pub mod key;
pub mod mapping;
pub mod options;
pub mod provenance;
pub mod record;
pub mod unit;
pub mod warning;

pub use error::{CurationError, Result};
pub use facts::{ColumnFacts, FactsSummary, SourceFacts, WarningGroup};
pub use key::{MeasurementKind, SUBJECT_ID_COLUMN, StandardKey};
pub use mapping::{ColumnMapping, MappingTable, RawColumnEntry, RawMappingTable, SourceMapping};
pub use options::{CurationOptions, UnmappedColumnPolicy, preserved_column_name};
pub use provenance::{NATIVE_RESOLUTION, ProvenanceRecord, quantization_label};
pub use record::MeasurementRecord;
pub use unit::{CanonicalUnit, SourceUnit};
pub use warning::{WarningEntry, WarningReason, WarningSink};
