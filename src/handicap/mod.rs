//! Regional handicap notation: normalisation, table lookup and targets.

pub mod normalize;
pub mod table;
pub mod target;

pub use normalize::normalize_token;
pub use table::ConversionTable;
pub use target::{LineTargetResolver, LineTargets};
