//! Fair-probability interpolation over a line curve.
//!
//! Queries resolve in this order:
//!
//! 1. Exact hit: the observed pair with its margin removed, untouched.
//! 2. Legacy zero line: when `0` is not quoted and its nearest quotes are
//!    exactly `-1` and `+1`, the average of their fair probabilities (kept
//!    for output compatibility; it is not a probability model). Any closer
//!    quote falls through to bracketing.
//! 3. Bracketing: linear interpolation of the *fair probability* between
//!    the nearest keys at or below and at or above the target. Prices are
//!    never interpolated directly.
//!
//! Targets outside `[min, max]` of the curve are always an error; there is
//! no extrapolation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::curve::LineCurve;
use super::margin::remove_margin;
use super::rounding::{grid_points, to_f64, LINE_STEP};
use crate::types::{FairPair, LineError, Side};

/// Linear interpolation between `a` and `b` at fraction `t` in [0, 1].
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Fractional position of `target` between `lower` and `upper`.
fn position(lower: Decimal, upper: Decimal, target: Decimal) -> f64 {
    to_f64((target - lower) / (upper - lower))
}

// ---------------------------------------------------------------------------
// Interpolator
// ---------------------------------------------------------------------------

/// Stateless fair-probability resolver. Cheap to copy and share.
#[derive(Debug, Clone, Copy)]
pub struct LineInterpolator {
    legacy_zero_line: bool,
}

impl Default for LineInterpolator {
    fn default() -> Self {
        Self {
            legacy_zero_line: true,
        }
    }
}

impl LineInterpolator {
    pub fn new(legacy_zero_line: bool) -> Self {
        Self { legacy_zero_line }
    }

    pub fn legacy_zero_line(&self) -> bool {
        self.legacy_zero_line
    }

    /// Fair probability of `side` covering at the home-relative `target`.
    pub fn fair_probability_at(
        &self,
        curve: &LineCurve,
        target: Decimal,
        side: Side,
    ) -> Result<f64, LineError> {
        Ok(self.fair_pair_at(curve, target)?.probability(side))
    }

    /// Fair pair at the home-relative `target`.
    pub fn fair_pair_at(&self, curve: &LineCurve, target: Decimal) -> Result<FairPair, LineError> {
        let out_of_range = || LineError::InterpolationRange {
            target,
            range: curve.describe_bounds(),
        };

        let (min, max) = curve.bounds().ok_or_else(out_of_range)?;

        if let Some(pair) = curve.observed(target) {
            return remove_margin(pair, target);
        }

        if self.legacy_zero_line && target.is_zero() {
            if let Some(fair) = self.zero_line_average(curve)? {
                return Ok(fair);
            }
        }

        if target < min || target > max {
            return Err(out_of_range());
        }

        let (lower, lower_pair) = curve.floor(target).ok_or_else(out_of_range)?;
        let (upper, upper_pair) = curve.ceil(target).ok_or_else(out_of_range)?;

        if lower == upper {
            return remove_margin(lower_pair, lower);
        }

        let fair_lower = remove_margin(lower_pair, lower)?;
        let fair_upper = remove_margin(upper_pair, upper)?;
        let t = position(lower, upper, target);
        let home = lerp(fair_lower.home(), fair_upper.home(), t);

        debug!(
            target = %target,
            lower = %lower,
            upper = %upper,
            t = format!("{t:.4}"),
            p_home = format!("{home:.5}"),
            "Interpolated fair probability"
        );

        Ok(FairPair::from_home(home))
    }

    /// Average of the ±1 fair probabilities, if they are the nearest quotes
    /// around zero.
    fn zero_line_average(&self, curve: &LineCurve) -> Result<Option<FairPair>, LineError> {
        let minus_one = dec!(-1);
        let plus_one = dec!(1);
        let (Some((lower, below)), Some((upper, above))) =
            (curve.floor(Decimal::ZERO), curve.ceil(Decimal::ZERO))
        else {
            return Ok(None);
        };
        if lower != minus_one || upper != plus_one {
            return Ok(None);
        }
        let below = remove_margin(below, minus_one)?;
        let above = remove_margin(above, plus_one)?;
        let home = (below.home() + above.home()) / 2.0;

        warn!(
            p_home = format!("{home:.5}"),
            "Zero line not quoted; using legacy average of the ±1 lines"
        );

        Ok(Some(FairPair::from_home(home)))
    }

    /// Expand a curve to every multiple of `step` between its bounds.
    ///
    /// The grid is a derived value: rebuild it when the observations
    /// change instead of patching it.
    pub fn fine_grid(&self, curve: &LineCurve, step: Decimal) -> Result<FineGrid, LineError> {
        if step <= Decimal::ZERO {
            return Err(LineError::Config(format!(
                "Fine grid step must be positive, got {step}"
            )));
        }
        let Some((min, max)) = curve.bounds() else {
            return Ok(FineGrid {
                step,
                points: BTreeMap::new(),
            });
        };

        let mut points = BTreeMap::new();
        for line in grid_points(min, max, step).into_iter().chain(curve.lines()) {
            if points.contains_key(&line) {
                continue;
            }
            points.insert(line, self.fair_pair_at(curve, line)?);
        }

        debug!(
            observed = curve.len(),
            expanded = points.len(),
            step = %step,
            "Fine grid materialised"
        );

        Ok(FineGrid { step, points })
    }

    /// [`fine_grid`](Self::fine_grid) on the 0.05 market grid.
    pub fn market_grid(&self, curve: &LineCurve) -> Result<FineGrid, LineError> {
        self.fine_grid(curve, LINE_STEP)
    }
}

// ---------------------------------------------------------------------------
// Fine grid
// ---------------------------------------------------------------------------

/// Immutable fair-probability table for one curve at a fixed step.
///
/// Share it behind an `Arc` and swap the whole value when prices move.
#[derive(Debug, Clone, PartialEq)]
pub struct FineGrid {
    step: Decimal,
    points: BTreeMap<Decimal, FairPair>,
}

impl FineGrid {
    pub fn step(&self) -> Decimal {
        self.step
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, line: Decimal) -> Option<FairPair> {
        self.points.get(&line).copied()
    }

    pub fn probability(&self, line: Decimal, side: Side) -> Option<f64> {
        self.get(line).map(|fair| fair.probability(side))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Decimal, FairPair)> + '_ {
        self.points.iter().map(|(k, v)| (*k, *v))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
