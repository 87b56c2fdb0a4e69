//! HANDICAP-EV: Regional handicap conversion and fixed-payout EV
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod handicap;
pub mod pricing;
pub mod strategy;
pub mod batch;
