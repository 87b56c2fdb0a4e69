//! Whole-curve scan: every grid key, both sides, ranked by EV.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::handicap::target::home_axis_key;
use crate::pricing::LineCurve;
use crate::strategy::evaluator::LineEvaluator;
use crate::types::{EvResult, LineError, MarketLine, Probability, Side};

/// One side of one curve key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineQuote {
    /// Home-axis key.
    pub curve_key: Decimal,
    pub side: Side,
    /// Points given by `side` at this key.
    pub target: Decimal,
    /// Regional label of `|curve_key|`, when it sits on the 0.05 grid.
    pub label: Option<String>,
    pub ev: EvResult,
}

#[derive(Debug, Clone, Copy)]
pub struct LineScanner {
    step: Decimal,
}

impl LineScanner {
    pub fn new(step: Decimal) -> Result<Self, LineError> {
        if step <= Decimal::ZERO {
            return Err(LineError::Config(format!(
                "Scan step must be positive, got {step}"
            )));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> Decimal {
        self.step
    }

    /// Quotes for both sides at every grid key (plus every observed key),
    /// sorted by EV with rebate, best first.
    pub fn scan(
        &self,
        evaluator: &LineEvaluator,
        curve: &LineCurve,
    ) -> Result<Vec<LineQuote>, LineError> {
        let grid = evaluator.interpolator().fine_grid(curve, self.step)?;
        let table = evaluator.table();

        let mut quotes = Vec::with_capacity(grid.len() * 2);
        for (key, fair) in grid.iter() {
            // Off-grid keys would snap onto a neighbour's label.
            let label = MarketLine::new(key.abs())
                .and_then(|line| table.to_regional(line.value()))
                .ok()
                .map(str::to_string);
            for side in [Side::Home, Side::Away] {
                let p = Probability::new(fair.probability(side))?;
                quotes.push(LineQuote {
                    curve_key: key,
                    side,
                    target: home_axis_key(key, side),
                    label: label.clone(),
                    ev: evaluator.engine().evaluate(p),
                });
            }
        }

        quotes.sort_by(|a, b| b.ev.ev_pct_rebate.total_cmp(&a.ev.ev_pct_rebate));
        Ok(quotes)
    }

    /// The `top_n` quotes at or above `min_ev` (EV% with rebate).
    pub fn best_lines(
        &self,
        evaluator: &LineEvaluator,
        curve: &LineCurve,
        top_n: usize,
        min_ev: f64,
    ) -> Result<Vec<LineQuote>, LineError> {
        let quotes = self.scan(evaluator, curve)?;
        let scanned = quotes.len();
        let best: Vec<LineQuote> = quotes
            .into_iter()
            .filter(|q| q.ev.ev_pct_rebate >= min_ev)
            .take(top_n)
            .collect();

        info!(
            scanned,
            kept = best.len(),
            min_ev = format!("{min_ev:+.2}%"),
            top = ?best.first().map(|q| format!("{}@{} {:+.2}%", q.side, q.curve_key, q.ev.ev_pct_rebate)),
            "Line scan complete"
        );

        Ok(best)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
