//! Margin removal for two-way prices.
//!
//! Implied weights are the reciprocals of the quoted prices; the fair
//! probability of each side is its weight over the sum of both weights.
//! There is never a draw leg in a handicap market.

use rust_decimal::Decimal;

use crate::types::{FairPair, LineError, PricePair};

/// Implied (margin-inclusive) probability of a single decimal price.
pub fn implied_probability(price: f64) -> f64 {
    1.0 / price
}

/// Strip the bookmaker margin from a price pair quoted at `line`.
///
/// Fails with [`LineError::InvalidPrice`] if either price is non-finite or
/// not above 1.0; bad observations are never repaired here.
pub fn remove_margin(pair: &PricePair, line: Decimal) -> Result<FairPair, LineError> {
    pair.validate(line)?;
    let home_weight = implied_probability(pair.home);
    let away_weight = implied_probability(pair.away);
    Ok(FairPair::from_home(home_weight / (home_weight + away_weight)))
}
