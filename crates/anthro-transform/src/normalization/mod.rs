//! Per-cell normalization: numeric parsing, unit conversion, quantization.

pub mod numeric;
pub mod quantize;
pub mod units;

pub use numeric::parse_f64;
pub use quantize::{quantize_scaled, round_half_up};
pub use units::{CellContext, CellOutcome, ConversionFailure, canonicalize_cell, convert_value};
