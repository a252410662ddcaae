//! Measurement transforms: unit canonicalization and outlier filtering.

pub mod normalization;
pub mod outlier;

pub use normalization::{
    CellContext, CellOutcome, ConversionFailure, canonicalize_cell, convert_value, parse_f64,
    quantize_scaled, round_half_up,
};
pub use outlier::{ColumnStats, KeyOutlierReport, OutlierBand, SkipReason, filter_outliers};
