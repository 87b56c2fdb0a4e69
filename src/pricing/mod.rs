//! Pricing engine: margin removal, line curves and interpolation.

pub mod curve;
pub mod interpolate;
pub mod margin;
pub mod rounding;

pub use curve::{CurvePoint, LineCurve};
pub use interpolate::{FineGrid, LineInterpolator};
