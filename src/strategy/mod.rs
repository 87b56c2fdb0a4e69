//! Strategy layer: fixed-payout EV, slip evaluation and line scanning.

pub mod ev;
pub mod evaluator;
pub mod scan;

pub use ev::{EvConfig, EvEngine, VerdictThresholds};
pub use evaluator::{LineEvaluator, SideEvaluation, SlipEvaluation};
pub use scan::{LineQuote, LineScanner};
