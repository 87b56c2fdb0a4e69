//! Regional ⇄ market conversion table.
//!
//! The table is data, not arithmetic: the published rows contain overrides
//! that no labelling formula reproduces (1.25 → "1.25", 1.50 → "1.5"), so
//! every row is embedded verbatim from `data/conversion_table.toml`.
//!
//! Build it once at startup and share it by reference (or `Arc`); it is
//! never mutated after construction.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use super::normalize::normalize_token;
use crate::pricing::rounding::{grid_points, snap_to_line, LINE_STEP};
use crate::types::{LineError, MarketLine};

/// The published table shipped with the crate.
pub const EMBEDDED_TABLE: &str = include_str!("../../data/conversion_table.toml");

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TableFile {
    version: String,
    lines: Vec<TableRow>,
    #[serde(default)]
    aliases: Vec<AliasRow>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    market: Decimal,
    label: String,
}

#[derive(Debug, Deserialize)]
struct AliasRow {
    token: String,
    resolves_to: String,
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Exhaustive bidirectional map between regional labels and the 0.05 grid.
#[derive(Debug, Clone)]
pub struct ConversionTable {
    version: String,
    labels: BTreeMap<MarketLine, String>,
    tokens: HashMap<String, MarketLine>,
    alias_count: usize,
}

impl ConversionTable {
    /// Parse the embedded table.
    pub fn embedded() -> Result<Self, LineError> {
        Self::from_toml_str(EMBEDDED_TABLE)
    }

    /// Load a table file in the embedded format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read conversion table: {}", path.display()))?;
        let table = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid conversion table: {}", path.display()))?;
        Ok(table)
    }

    /// Parse and validate a table document.
    ///
    /// Fails unless every grid point from 0.00 to 4.00 has exactly one
    /// label, labels are unique, and every alias resolves to a label.
    pub fn from_toml_str(contents: &str) -> Result<Self, LineError> {
        let file: TableFile = toml::from_str(contents)
            .map_err(|e| LineError::Config(format!("Unparseable conversion table: {e}")))?;

        let mut labels = BTreeMap::new();
        let mut tokens = HashMap::new();

        for row in &file.lines {
            let market = MarketLine::new(row.market)
                .map_err(|e| LineError::Config(format!("Bad table row '{}': {e}", row.label)))?;
            let label = normalize_token(&row.label);
            if label.is_empty() {
                return Err(LineError::Config(format!("Empty label for {market}")));
            }
            if labels.insert(market, label.clone()).is_some() {
                return Err(LineError::Config(format!("Duplicate table row for {market}")));
            }
            if tokens.insert(label.clone(), market).is_some() {
                return Err(LineError::Config(format!("Duplicate label '{label}'")));
            }
        }

        for point in grid_points(Decimal::ZERO, MarketLine::MAX, LINE_STEP) {
            let market = MarketLine::new(point)?;
            if !labels.contains_key(&market) {
                return Err(LineError::Config(format!("Table has no row for {market}")));
            }
        }

        for alias in &file.aliases {
            let token = normalize_token(&alias.token);
            let target = normalize_token(&alias.resolves_to);
            let market = *tokens.get(&target).ok_or_else(|| {
                LineError::Config(format!(
                    "Alias '{}' resolves to unknown label '{}'",
                    alias.token, alias.resolves_to
                ))
            })?;
            match tokens.get(&token) {
                Some(existing) if *existing != market => {
                    return Err(LineError::Config(format!(
                        "Alias '{token}' conflicts with label for {existing}"
                    )));
                }
                _ => {
                    tokens.insert(token, market);
                }
            }
        }

        let table = Self {
            version: file.version,
            alias_count: file.aliases.len(),
            labels,
            tokens,
        };

        info!(
            version = %table.version,
            lines = table.labels.len(),
            aliases = table.alias_count,
            "Conversion table loaded"
        );

        Ok(table)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of grid rows (always 81 for a valid table).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of input-only alias tokens.
    pub fn alias_count(&self) -> usize {
        self.alias_count
    }

    /// Resolve a regional token (label or alias) to its market line.
    pub fn to_market(&self, token: &str) -> Result<MarketLine, LineError> {
        let normalized = normalize_token(token);
        if normalized.is_empty() {
            return Err(LineError::Conversion("Empty handicap token".to_string()));
        }
        let market = self.tokens.get(&normalized).copied().ok_or_else(|| {
            LineError::Conversion(format!(
                "Unknown regional handicap: '{token}' (normalised: '{normalized}')"
            ))
        })?;
        debug!(token, normalized = %normalized, market = %market, "Token resolved");
        Ok(market)
    }

    /// Canonical regional label for a market value, after snapping it to
    /// the nearest 0.05.
    pub fn to_regional(&self, value: Decimal) -> Result<&str, LineError> {
        if value < Decimal::ZERO {
            return Err(LineError::Conversion(format!(
                "Negative market line: {value}"
            )));
        }
        let snapped = snap_to_line(value);
        let market = MarketLine::new(snapped)?;
        self.labels
            .get(&market)
            .map(String::as_str)
            .ok_or_else(|| LineError::Conversion(format!("No label for market line {market}")))
    }

    /// Alias in, canonical label out.
    pub fn canonical_label(&self, token: &str) -> Result<&str, LineError> {
        let market = self.to_market(token)?;
        self.to_regional(market.value())
    }

    /// Whether `token` is accepted only as an alias of another label.
    pub fn is_alias(&self, token: &str) -> bool {
        match self.canonical_label(token) {
            Ok(canonical) => canonical != normalize_token(token),
            Err(_) => false,
        }
    }

    /// True when the token survives token → market → label → market unchanged.
    pub fn round_trips(&self, token: &str) -> bool {
        let Ok(market) = self.to_market(token) else {
            return false;
        };
        self.to_regional(market.value())
            .and_then(|label| self.to_market(label))
            .map(|back| back == market)
            .unwrap_or(false)
    }

    /// Every grid row in ascending market order.
    pub fn entries(&self) -> impl Iterator<Item = (MarketLine, &str)> + '_ {
        self.labels.iter().map(|(m, l)| (*m, l.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
