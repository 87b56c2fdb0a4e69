//! Favorite/underdog target lines.
//!
//! Sign convention, used everywhere in the crate:
//!
//! - A role's *target* is the number of points that role gives:
//!   favorite `+m`, underdog `-m`, whichever concrete side is favored.
//! - Curves are keyed on the home axis (the handicap applied to home), so
//!   a team giving `t` points sits at key `-t` when it is home and `+t`
//!   when it is away.
//!
//! Both roles therefore land on the same curve key and read opposite legs
//! of the same price pair.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::types::{Role, Side};

/// Home-axis curve key for a side giving `target` points.
pub fn home_axis_key(target: Decimal, side: Side) -> Decimal {
    let key = match side {
        Side::Home => -target,
        Side::Away => target,
    };
    if key.is_zero() {
        Decimal::ZERO
    } else {
        key
    }
}

/// Resolved targets for one slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineTargets {
    pub magnitude: Decimal,
    pub favored: Side,
    /// Points given by the favorite (`+magnitude`).
    pub favorite: Decimal,
    /// Points given by the underdog (`-magnitude`).
    pub underdog: Decimal,
}

impl LineTargets {
    /// The concrete side playing `role`.
    pub fn side_for(&self, role: Role) -> Side {
        match role {
            Role::Favorite => self.favored,
            Role::Underdog => self.favored.opposite(),
        }
    }

    /// Points given by `role`.
    pub fn target_for(&self, role: Role) -> Decimal {
        match role {
            Role::Favorite => self.favorite,
            Role::Underdog => self.underdog,
        }
    }

    /// Home-axis curve key at which `role` is priced.
    pub fn curve_key(&self, role: Role) -> Decimal {
        home_axis_key(self.target_for(role), self.side_for(role))
    }
}

/// Derives symmetric targets from a magnitude and the favored side.
pub struct LineTargetResolver;

impl LineTargetResolver {
    /// The sign of `magnitude` is ignored; only the favored side decides
    /// direction.
    pub fn resolve(magnitude: Decimal, favored: Side) -> LineTargets {
        let magnitude = magnitude.abs();
        let targets = LineTargets {
            magnitude,
            favored,
            favorite: magnitude,
            underdog: if magnitude.is_zero() { Decimal::ZERO } else { -magnitude },
        };
        debug!(
            magnitude = %magnitude,
            favored = %favored,
            key = %targets.curve_key(Role::Favorite),
            "Line targets resolved"
        );
        targets
    }
}
