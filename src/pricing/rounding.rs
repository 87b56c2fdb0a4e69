//! Grid snapping and rebate quantisation.
//!
//! All rounding in the engine is round-half-away-from-zero on exact
//! decimals, so a value sitting exactly between two steps always moves to
//! the larger magnitude (e.g. a 0.0175 rebate becomes 0.020).

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Spacing of the market line grid.
pub const LINE_STEP: Decimal = dec!(0.05);

/// Upper bound of the turnover rebate rate.
pub const REBATE_MAX: Decimal = dec!(0.03);

/// Rebate rates are applied in half-percent steps.
pub const REBATE_STEP: Decimal = dec!(0.005);

/// Snap `value` to the nearest multiple of `step` (half away from zero).
///
/// A non-positive `step` returns the value unchanged.
pub fn snap_to_step(value: Decimal, step: Decimal) -> Decimal {
    if step <= Decimal::ZERO {
        return value;
    }
    let units = (value / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let snapped = units * step;
    // Drop a negative zero so -0.00 and 0.00 print the same.
    if snapped.is_zero() {
        Decimal::ZERO
    } else {
        snapped
    }
}

/// Snap to the 0.05 market grid.
pub fn snap_to_line(value: Decimal) -> Decimal {
    snap_to_step(value, LINE_STEP)
}

/// Clamp a rebate rate to [0, 0.03] then snap it to the nearest 0.005.
pub fn quantize_rebate(rate: Decimal) -> Decimal {
    let clamped = rate.clamp(Decimal::ZERO, REBATE_MAX);
    snap_to_step(clamped, REBATE_STEP).round_dp(3)
}

/// Every multiple of `step` inside `[min, max]`, ascending.
pub fn grid_points(min: Decimal, max: Decimal, step: Decimal) -> Vec<Decimal> {
    if step <= Decimal::ZERO || min > max {
        return Vec::new();
    }
    let (Some(first), Some(last)) = ((min / step).ceil().to_i64(), (max / step).floor().to_i64())
    else {
        return Vec::new();
    };
    (first..=last)
        .map(|i| {
            let v = Decimal::from(i) * step;
            if v.is_zero() {
                Decimal::ZERO
            } else {
                v
            }
        })
        .collect()
}

/// Lossy conversion for arithmetic that mixes exact configuration values
/// with floating probabilities.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
