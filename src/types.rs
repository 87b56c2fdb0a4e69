//! Shared types for the handicap EV engine.
//!
//! These types form the data model used across the conversion, pricing
//! and strategy modules. They carry no behaviour beyond validation and
//! small accessors so that every other module can depend on them without
//! circular references.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Sides and roles
// ---------------------------------------------------------------------------

/// One of the two participants in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// The opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// Parse a side name (case-insensitive).
impl std::str::FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" | "h" => Ok(Side::Home),
            "away" | "a" => Ok(Side::Away),
            other => Err(anyhow::anyhow!("Unknown side: {other}")),
        }
    }
}

/// Favorite or underdog, independent of which concrete side plays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Favorite,
    Underdog,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Favorite => write!(f, "favorite"),
            Role::Underdog => write!(f, "underdog"),
        }
    }
}

// ---------------------------------------------------------------------------
// Market line
// ---------------------------------------------------------------------------

/// An unsigned handicap on the market grid: a multiple of 0.05 in [0.00, 4.00].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MarketLine(Decimal);

impl MarketLine {
    /// Grid spacing.
    pub const STEP: Decimal = dec!(0.05);
    /// Largest published line.
    pub const MAX: Decimal = dec!(4.00);

    /// Validate a value that must already sit exactly on the grid.
    pub fn new(value: Decimal) -> Result<Self, LineError> {
        if value < Decimal::ZERO {
            return Err(LineError::Conversion(format!(
                "Negative market line: {value}"
            )));
        }
        if value > Self::MAX {
            return Err(LineError::Conversion(format!(
                "Market line {value} above {}",
                Self::MAX
            )));
        }
        if !(value % Self::STEP).is_zero() {
            return Err(LineError::Conversion(format!(
                "Market line {value} is not a multiple of {}",
                Self::STEP
            )));
        }
        // Fixed scale so 1.5 and 1.50 print identically.
        let mut v = value.abs();
        v.rescale(2);
        Ok(Self(v))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for MarketLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Prices and probabilities
// ---------------------------------------------------------------------------

/// Two-way decimal prices quoted at one line of a home-relative curve.
///
/// `home` is the price of the home side at the curve key `k`; `away` is the
/// price of the away side at `-k`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePair {
    pub home: f64,
    pub away: f64,
}

impl PricePair {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }

    /// Price quoted for one side.
    pub fn price(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// Reject non-finite prices and anything at or below evens-of-stake (1.0).
    pub fn validate(&self, line: Decimal) -> Result<(), LineError> {
        for price in [self.home, self.away] {
            if !price.is_finite() || price <= 1.0 {
                return Err(LineError::InvalidPrice { line, price });
            }
        }
        Ok(())
    }

    /// Bookmaker overround: sum of implied probabilities minus one.
    pub fn overround(&self) -> f64 {
        1.0 / self.home + 1.0 / self.away - 1.0
    }
}

/// Margin-free probabilities of the two sides covering at one curve key.
///
/// Always sums to 1.0 (within floating tolerance); both components lie in (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairPair {
    home: f64,
    away: f64,
}

impl FairPair {
    /// Closest a fair probability may get to 0 or 1.
    pub const EDGE: f64 = 1e-6;

    /// Build from the home probability, clamped to `[EDGE, 1 - EDGE]`; the
    /// away leg is its complement.
    pub(crate) fn from_home(home: f64) -> Self {
        let home = home.clamp(Self::EDGE, 1.0 - Self::EDGE);
        Self {
            home,
            away: 1.0 - home,
        }
    }

    pub fn home(&self) -> f64 {
        self.home
    }

    pub fn away(&self) -> f64 {
        self.away
    }

    pub fn probability(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// A win probability strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Probability(f64);

impl Probability {
    pub fn new(p: f64) -> Result<Self, LineError> {
        if !p.is_finite() || p <= 0.0 || p >= 1.0 {
            return Err(LineError::InvalidProbability(p));
        }
        Ok(Self(p))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Fair (margin-free) decimal price: the reciprocal of the probability.
    pub fn fair_price(&self) -> f64 {
        1.0 / self.0
    }
}

// ---------------------------------------------------------------------------
// EV results
// ---------------------------------------------------------------------------

/// Qualitative EV band, ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ClearPlus,
    Plus,
    Fair,
    Minus,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::ClearPlus => "clear_plus",
            Verdict::Plus => "plus",
            Verdict::Fair => "fair",
            Verdict::Minus => "minus",
        }
    }

    /// Whether the bet has non-negative expected value.
    pub fn is_positive(&self) -> bool {
        matches!(self, Verdict::ClearPlus | Verdict::Plus)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected value of one fixed-payout bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvResult {
    pub fair_probability: f64,
    /// Reciprocal of the fair probability.
    pub fair_price: f64,
    /// EV% without rebate.
    pub ev_pct: f64,
    /// EV% with the turnover rebate folded into the payout.
    pub ev_pct_rebate: f64,
    pub effective_payout: Decimal,
    pub verdict: Verdict,
}

impl fmt::Display for EvResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p={:.2}% fair={:.3} EV={:+.2}% (rebate {:+.2}% @ {}) [{}]",
            self.fair_probability * 100.0,
            self.fair_price,
            self.ev_pct,
            self.ev_pct_rebate,
            self.effective_payout,
            self.verdict,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Every expected failure of the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LineError {
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Line {target} outside observed range {range}")]
    InterpolationRange { target: Decimal, range: String },

    #[error("Invalid price at line {line}: {price}")]
    InvalidPrice { line: Decimal, price: f64 },

    #[error("Invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LineError::Conversion(_) => ErrorKind::Conversion,
            LineError::InterpolationRange { .. } => ErrorKind::InterpolationRange,
            LineError::InvalidPrice { .. } => ErrorKind::InvalidPrice,
            LineError::InvalidProbability(_) => ErrorKind::InvalidProbability,
            LineError::Config(_) => ErrorKind::Configuration,
        }
    }
}

/// Serialisable tag for a [`LineError`], used in batch outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Conversion,
    InterpolationRange,
    InvalidPrice,
    InvalidProbability,
    Configuration,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
