//! Fixed-payout expected value with turnover rebate.
//!
//! A regional book pays a fixed multiplier on a winning handicap bet and
//! returns a rebate on every stake regardless of outcome. Both fold into
//! a single effective payout:
//!
//!   effective = payout + rebate
//!   EV%       = (p × effective − 1) × 100

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::pricing::rounding::{quantize_rebate, to_f64};
use crate::types::{EvResult, LineError, Probability, Verdict};

// ---------------------------------------------------------------------------
// Configuration (defaults; config.toml overrides at runtime)
// ---------------------------------------------------------------------------

/// Inclusive lower bounds (in EV%) of the verdict bands.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub clear_plus: f64,
    pub plus: f64,
    pub fair: f64,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            clear_plus: 5.0,
            plus: 0.0,
            fair: -3.0,
        }
    }
}

impl VerdictThresholds {
    /// Require finite values ordered `clear_plus >= plus >= fair`.
    pub fn validate(&self) -> Result<(), LineError> {
        let all = [self.clear_plus, self.plus, self.fair];
        if all.iter().any(|t| !t.is_finite()) {
            return Err(LineError::Config(format!(
                "Verdict thresholds must be finite: {self:?}"
            )));
        }
        if self.clear_plus < self.plus || self.plus < self.fair {
            return Err(LineError::Config(format!(
                "Verdict thresholds out of order (need clear_plus >= plus >= fair): {self:?}"
            )));
        }
        Ok(())
    }
}

/// EV engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvConfig {
    /// Fixed payout multiplier on a win (stake included).
    pub payout: Decimal,
    /// Turnover rebate rate; clamped to [0, 0.03] and snapped to 0.005.
    pub rebate: Decimal,
    pub thresholds: VerdictThresholds,
}

impl Default for EvConfig {
    fn default() -> Self {
        Self {
            payout: dec!(1.9),
            rebate: Decimal::ZERO,
            thresholds: VerdictThresholds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Band an EV% against thresholds, highest band first.
///
/// Threshold ordering is not checked here; see [`VerdictThresholds::validate`].
pub fn verdict(ev_pct: f64, thresholds: &VerdictThresholds) -> Verdict {
    if ev_pct >= thresholds.clear_plus {
        Verdict::ClearPlus
    } else if ev_pct >= thresholds.plus {
        Verdict::Plus
    } else if ev_pct >= thresholds.fair {
        Verdict::Fair
    } else {
        Verdict::Minus
    }
}

/// EV% without rebate.
pub fn ev_plain(probability: f64, payout: Decimal) -> f64 {
    (probability * to_f64(payout) - 1.0) * 100.0
}

/// Payout plus the quantised rebate rate.
pub fn effective_payout(payout: Decimal, rebate: Decimal) -> Decimal {
    payout + quantize_rebate(rebate)
}

/// EV% with the rebate folded into the payout.
pub fn ev_with_rebate(probability: f64, payout: Decimal, rebate: Decimal) -> f64 {
    (probability * to_f64(effective_payout(payout, rebate)) - 1.0) * 100.0
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Validated EV calculator. Immutable after construction and safe to share.
#[derive(Debug, Clone)]
pub struct EvEngine {
    payout: Decimal,
    rebate: Decimal,
    thresholds: VerdictThresholds,
}

impl EvEngine {
    /// Validate the configuration once; per-call methods never fail on it.
    pub fn new(config: EvConfig) -> Result<Self, LineError> {
        if config.payout <= Decimal::ZERO {
            return Err(LineError::Config(format!(
                "Payout must be positive, got {}",
                config.payout
            )));
        }
        config.thresholds.validate()?;

        let rebate = quantize_rebate(config.rebate);
        if rebate != config.rebate {
            warn!(
                requested = %config.rebate,
                applied = %rebate,
                "Rebate clamped/snapped to 0.5% steps within [0%, 3%]"
            );
        }

        Ok(Self {
            payout: config.payout,
            rebate,
            thresholds: config.thresholds,
        })
    }

    pub fn payout(&self) -> Decimal {
        self.payout
    }

    /// The rebate rate actually applied (already quantised).
    pub fn rebate(&self) -> Decimal {
        self.rebate
    }

    pub fn thresholds(&self) -> &VerdictThresholds {
        &self.thresholds
    }

    pub fn effective_payout(&self) -> Decimal {
        self.payout + self.rebate
    }

    pub fn ev_plain(&self, probability: Probability) -> f64 {
        ev_plain(probability.value(), self.payout)
    }

    pub fn ev_with_rebate(&self, probability: Probability) -> f64 {
        (probability.value() * to_f64(self.effective_payout()) - 1.0) * 100.0
    }

    pub fn verdict(&self, ev_pct: f64) -> Verdict {
        verdict(ev_pct, &self.thresholds)
    }

    /// Full evaluation of one fair probability. The verdict is taken on
    /// the rebate-inclusive EV.
    pub fn evaluate(&self, probability: Probability) -> EvResult {
        let ev_pct = self.ev_plain(probability);
        let ev_pct_rebate = self.ev_with_rebate(probability);
        let verdict = self.verdict(ev_pct_rebate);

        debug!(
            p = format!("{:.4}", probability.value()),
            ev = format!("{ev_pct:+.2}%"),
            ev_rebate = format!("{ev_pct_rebate:+.2}%"),
            verdict = %verdict,
            "EV evaluated"
        );

        EvResult {
            fair_probability: probability.value(),
            fair_price: probability.fair_price(),
            ev_pct,
            ev_pct_rebate,
            effective_payout: self.effective_payout(),
            verdict,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
