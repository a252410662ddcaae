//! Column mapping for raw anthropometric survey tables.

pub mod loader;
pub mod mapper;

pub use loader::{MappingOverview, load_mapping_table, overview, parse_mapping_table};
pub use mapper::{
    ColumnDecision, ColumnMapper, KeySource, MappedRow, MappedValue, ResolvedColumns,
};
