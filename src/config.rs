//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section and field has a default, so an empty file (or no file at all)
//! yields the published regional settings.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::handicap::ConversionTable;
use crate::pricing::LineInterpolator;
use crate::strategy::{EvConfig, EvEngine, LineEvaluator, LineScanner, VerdictThresholds};

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "HANDICAP_EV_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub evaluation: EvaluationConfig,
    pub interpolation: InterpolationConfig,
    pub table: TableConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Fixed payout multiplier on a win.
    pub payout: Decimal,
    /// Turnover rebate rate (0.015 = 1.5%).
    pub rebate: Decimal,
    pub thresholds: VerdictThresholds,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            payout: dec!(1.9),
            rebate: Decimal::ZERO,
            thresholds: VerdictThresholds::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Average the ±1 lines when 0 is not quoted.
    pub legacy_zero_line: bool,
    pub fine_grid_step: Decimal,
    pub scan_step: Decimal,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            legacy_zero_line: true,
            fine_grid_step: dec!(0.05),
            scan_step: dec!(0.25),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TableConfig {
    /// External conversion table; the embedded one is used when absent.
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "No config file; using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid config TOML")
    }

    pub fn ev_config(&self) -> EvConfig {
        EvConfig {
            payout: self.evaluation.payout,
            rebate: self.evaluation.rebate,
            thresholds: self.evaluation.thresholds,
        }
    }

    pub fn interpolator(&self) -> LineInterpolator {
        LineInterpolator::new(self.interpolation.legacy_zero_line)
    }

    pub fn scanner(&self) -> Result<LineScanner> {
        Ok(LineScanner::new(self.interpolation.scan_step)?)
    }

    /// The configured table file, or the embedded table.
    pub fn conversion_table(&self) -> Result<ConversionTable> {
        match &self.table.path {
            Some(path) => ConversionTable::load(path),
            None => Ok(ConversionTable::embedded()?),
        }
    }

    /// Validate everything and assemble the shared evaluator.
    pub fn build_evaluator(&self) -> Result<LineEvaluator> {
        let table = self.conversion_table()?;
        let engine = EvEngine::new(self.ev_config()).context("Invalid [evaluation] settings")?;
        if self.interpolation.fine_grid_step <= Decimal::ZERO {
            anyhow::bail!(
                "Invalid [interpolation] settings: fine_grid_step must be positive, got {}",
                self.interpolation.fine_grid_step
            );
        }
        Ok(LineEvaluator::new(
            Arc::new(table),
            engine,
            self.interpolator(),
        ))
    }
}
