//! Slip evaluation: token → targets → fair probability → EV, for both roles.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::handicap::{ConversionTable, LineTargetResolver, LineTargets};
use crate::pricing::{LineCurve, LineInterpolator};
use crate::strategy::ev::EvEngine;
use crate::types::{EvResult, LineError, MarketLine, Probability, Role, Side};

/// One role of an evaluated slip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideEvaluation {
    pub role: Role,
    pub side: Side,
    /// Points given by this role.
    pub target: Decimal,
    /// Home-axis key the probability was read at.
    pub curve_key: Decimal,
    /// Raw quoted price when the key was observed, `None` when interpolated.
    pub observed_price: Option<f64>,
    pub ev: EvResult,
}

/// Both roles of one regional handicap slip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipEvaluation {
    pub token: String,
    pub market_line: MarketLine,
    /// Canonical regional label of the market line.
    pub label: String,
    pub favored: Side,
    pub favorite: SideEvaluation,
    pub underdog: SideEvaluation,
}

impl SlipEvaluation {
    /// The role with the higher rebate-inclusive EV.
    pub fn best(&self) -> &SideEvaluation {
        if self.underdog.ev.ev_pct_rebate > self.favorite.ev.ev_pct_rebate {
            &self.underdog
        } else {
            &self.favorite
        }
    }
}

/// Shared, immutable evaluation pipeline.
///
/// Build once at startup and share behind an `Arc`; every method takes
/// `&self`.
#[derive(Debug, Clone)]
pub struct LineEvaluator {
    table: Arc<ConversionTable>,
    engine: EvEngine,
    interpolator: LineInterpolator,
}

impl LineEvaluator {
    pub fn new(
        table: Arc<ConversionTable>,
        engine: EvEngine,
        interpolator: LineInterpolator,
    ) -> Self {
        info!(
            table_version = table.version(),
            payout = %engine.payout(),
            rebate = %engine.rebate(),
            legacy_zero_line = interpolator.legacy_zero_line(),
            "Line evaluator ready"
        );
        Self {
            table,
            engine,
            interpolator,
        }
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    pub fn engine(&self) -> &EvEngine {
        &self.engine
    }

    pub fn interpolator(&self) -> &LineInterpolator {
        &self.interpolator
    }

    /// Evaluate a regional token with `favored` giving the points.
    pub fn evaluate(
        &self,
        token: &str,
        favored: Side,
        curve: &LineCurve,
    ) -> Result<SlipEvaluation, LineError> {
        let market_line = self.table.to_market(token)?;
        let label = self.table.to_regional(market_line.value())?.to_string();
        let targets = LineTargetResolver::resolve(market_line.value(), favored);

        let favorite = self.evaluate_role(&targets, Role::Favorite, curve)?;
        let underdog = self.evaluate_role(&targets, Role::Underdog, curve)?;

        debug!(
            token,
            market = %market_line,
            favored = %favored,
            favorite_ev = format!("{:+.2}%", favorite.ev.ev_pct_rebate),
            underdog_ev = format!("{:+.2}%", underdog.ev.ev_pct_rebate),
            "Slip evaluated"
        );

        Ok(SlipEvaluation {
            token: token.to_string(),
            market_line,
            label,
            favored,
            favorite,
            underdog,
        })
    }

    /// Evaluate `side` at a home-axis key directly.
    pub fn evaluate_key(
        &self,
        curve: &LineCurve,
        key: Decimal,
        side: Side,
    ) -> Result<EvResult, LineError> {
        let p = self.interpolator.fair_probability_at(curve, key, side)?;
        Ok(self.engine.evaluate(Probability::new(p)?))
    }

    fn evaluate_role(
        &self,
        targets: &LineTargets,
        role: Role,
        curve: &LineCurve,
    ) -> Result<SideEvaluation, LineError> {
        let side = targets.side_for(role);
        let curve_key = targets.curve_key(role);
        let ev = self.evaluate_key(curve, curve_key, side)?;

        let observed = curve.observed(curve_key);
        if let Some(pair) = observed {
            debug!(
                key = %curve_key,
                role = %role,
                overround = format!("{:.2}%", pair.overround() * 100.0),
                "Read quoted line"
            );
        }

        Ok(SideEvaluation {
            role,
            side,
            target: targets.target_for(role),
            curve_key,
            observed_price: observed.map(|pair| pair.price(side)),
            ev,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
