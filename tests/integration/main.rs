//! End-to-end tests against the public library surface.

mod concurrency;
mod flow;
mod table_roundtrip;

use std::sync::Arc;

use handicap_ev::handicap::ConversionTable;
use handicap_ev::pricing::{CurvePoint, LineCurve, LineInterpolator};
use handicap_ev::strategy::{EvConfig, EvEngine, LineEvaluator};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Evaluator with the embedded table and the given rebate.
pub fn evaluator_with_rebate(rebate: Decimal) -> LineEvaluator {
    LineEvaluator::new(
        Arc::new(ConversionTable::embedded().unwrap()),
        EvEngine::new(EvConfig {
            rebate,
            ..EvConfig::default()
        })
        .unwrap(),
        LineInterpolator::default(),
    )
}

pub fn evaluator() -> LineEvaluator {
    evaluator_with_rebate(Decimal::ZERO)
}

/// A realistic home-favorite curve, monotonic in the home probability.
pub fn sample_curve() -> LineCurve {
    vec![
        CurvePoint { line: dec!(-2.5), home: 2.60, away: 1.50 },
        CurvePoint { line: dec!(-2), home: 2.20, away: 1.68 },
        CurvePoint { line: dec!(-1.5), home: 1.92, away: 1.92 },
        CurvePoint { line: dec!(-1), home: 1.62, away: 2.30 },
        CurvePoint { line: dec!(-0.5), home: 1.42, away: 2.85 },
        CurvePoint { line: dec!(0), home: 1.28, away: 3.60 },
        CurvePoint { line: dec!(0.5), home: 1.17, away: 5.00 },
        CurvePoint { line: dec!(1), home: 1.10, away: 7.00 },
    ]
    .into()
}
