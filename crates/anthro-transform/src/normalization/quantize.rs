//! Round-half-up quantization.
//!
//! Halves round away from zero (`0.0025 m` at `0.001 m` becomes `0.003 m`,
//! not the banker's `0.002 m`). When the step has an integral inverse the
//! conversion and the rounding happen in one multiplication so that decimal
//! inputs such as `123.45 cm` land on the expected step.

/// Absorbs binary representation error of decimal halves.
const HALF_EPSILON: f64 = 1e-9;

fn round_half_away(value: f64) -> f64 {
    if value < 0.0 {
        -(-value + 0.5 + HALF_EPSILON).floor()
    } else {
        (value + 0.5 + HALF_EPSILON).floor()
    }
}

/// Round `value` to the nearest multiple of `step`, halves away from zero.
pub fn round_half_up(value: f64, step: f64) -> f64 {
    quantize_scaled(value, 1.0, step)
}

/// Compute `round_half_up(raw / scale, step)`.
pub fn quantize_scaled(raw: f64, scale: f64, step: f64) -> f64 {
    let per_unit = 1.0 / step;
    let steps_per_unit = per_unit.round();
    if steps_per_unit >= 1.0 && (per_unit - steps_per_unit).abs() <= 1e-9 * steps_per_unit {
        round_half_away(raw * (steps_per_unit / scale)) / steps_per_unit
    } else {
        round_half_away(raw / scale / step) * step
    }
}
