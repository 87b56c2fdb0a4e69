//! Per-game line curves.
//!
//! A curve is home-relative: key `k` is the handicap applied to the home
//! side (negative means home gives points) and the stored [`PricePair`]
//! holds the home price at `k` with the away price at `-k`. Curves are
//! built fresh per query from fetched prices and never mutated by the
//! pricing code.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::PricePair;

/// One observation as delivered by the odds-fetch collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub line: Decimal,
    pub home: f64,
    pub away: f64,
}

/// Ordered (line → price pair) observations for one game.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<CurvePoint>")]
pub struct LineCurve {
    points: BTreeMap<Decimal, PricePair>,
}

impl LineCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an observation, returning the one it replaced.
    pub fn insert(&mut self, line: Decimal, pair: PricePair) -> Option<PricePair> {
        self.points.insert(line.normalize(), pair)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest and largest observed keys.
    pub fn bounds(&self) -> Option<(Decimal, Decimal)> {
        let min = self.points.keys().next()?;
        let max = self.points.keys().next_back()?;
        Some((*min, *max))
    }

    /// The pair observed exactly at `line`, if any.
    pub fn observed(&self, line: Decimal) -> Option<&PricePair> {
        self.points.get(&line)
    }

    /// Nearest observation at or below `target`.
    pub fn floor(&self, target: Decimal) -> Option<(Decimal, &PricePair)> {
        self.points.range(..=target).next_back().map(|(k, v)| (*k, v))
    }

    /// Nearest observation at or above `target`.
    pub fn ceil(&self, target: Decimal) -> Option<(Decimal, &PricePair)> {
        self.points.range(target..).next().map(|(k, v)| (*k, v))
    }

    pub fn lines(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Decimal, &PricePair)> + '_ {
        self.points.iter().map(|(k, v)| (*k, v))
    }

    /// Human-readable range used in error messages.
    pub fn describe_bounds(&self) -> String {
        match self.bounds() {
            Some((min, max)) => format!("[{min}, {max}]"),
            None => "(empty curve)".to_string(),
        }
    }
}

/// Later points at the same line replace earlier ones.
impl From<Vec<CurvePoint>> for LineCurve {
    fn from(points: Vec<CurvePoint>) -> Self {
        points.into_iter().collect()
    }
}

impl FromIterator<CurvePoint> for LineCurve {
    fn from_iter<I: IntoIterator<Item = CurvePoint>>(iter: I) -> Self {
        let mut curve = LineCurve::new();
        for p in iter {
            curve.insert(p.line, PricePair::new(p.home, p.away));
        }
        curve
    }
}

impl FromIterator<(Decimal, PricePair)> for LineCurve {
    fn from_iter<I: IntoIterator<Item = (Decimal, PricePair)>>(iter: I) -> Self {
        let mut curve = LineCurve::new();
        for (line, pair) in iter {
            curve.insert(line, pair);
        }
        curve
    }
}
