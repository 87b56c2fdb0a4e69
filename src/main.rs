//! HANDICAP-EV: Regional handicap conversion and fixed-payout EV
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the shared evaluator once and dispatches one subcommand.
//! Results go to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use handicap_ev::batch::{self, SlipRequest};
use handicap_ev::config::{self, AppConfig};
use handicap_ev::pricing::{CurvePoint, LineCurve};

/// Regional handicap conversion and fixed-payout EV evaluation.
#[derive(Parser, Debug)]
#[command(name = "handicap-ev")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults apply when it is missing)
    #[arg(short, long, env = config::CONFIG_ENV, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a regional token to its market line and canonical label
    Convert {
        token: String,
    },

    /// Regional label for a market line (snapped to 0.05)
    Label {
        #[arg(allow_hyphen_values = true)]
        value: Decimal,
    },

    /// Evaluate a JSON array of slips
    Evaluate {
        /// JSON file of `{id?, token, favored, curve}` requests
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Rank every line of one curve by EV
    Scan {
        /// JSON file holding the curve as `[{line, home, away}, ...]`
        #[arg(short, long)]
        input: PathBuf,

        /// Keep at most this many lines
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Minimum EV% (rebate included)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        min_ev: f64,
    },

    /// Fair probabilities of one curve on the fine grid
    Grid {
        /// JSON file holding the curve as `[{line, home, away}, ...]`
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct Conversion<'a> {
    token: &'a str,
    market: Decimal,
    label: &'a str,
    alias: bool,
}

#[derive(Serialize)]
struct GridRow {
    line: Decimal,
    home: f64,
    away: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    // Initialise structured logging
    init_logging();

    let cfg = AppConfig::load_or_default(&cli.config)?;
    let evaluator = Arc::new(cfg.build_evaluator()?);

    match cli.command {
        Commands::Convert { token } => {
            let table = evaluator.table();
            let market = table.to_market(&token)?;
            let label = table.to_regional(market.value())?;
            print_json(&Conversion {
                token: &token,
                market: market.value(),
                label,
                alias: table.is_alias(&token),
            })?;
        }

        Commands::Label { value } => {
            let label = evaluator.table().to_regional(value)?;
            println!("{label}");
        }

        Commands::Evaluate { input } => {
            let requests: Vec<SlipRequest> = read_json(&input)?;
            info!(requests = requests.len(), input = %input.display(), "Evaluating slips");
            let report = batch::run_batch(Arc::clone(&evaluator), requests).await?;
            print_json(&report)?;
        }

        Commands::Scan { input, top, min_ev } => {
            let curve = read_curve(&input)?;
            let quotes = cfg.scanner()?.best_lines(&evaluator, &curve, top, min_ev)?;
            print_json(&quotes)?;
        }

        Commands::Grid { input } => {
            let curve = read_curve(&input)?;
            let grid = evaluator
                .interpolator()
                .fine_grid(&curve, cfg.interpolation.fine_grid_step)?;
            let rows: Vec<GridRow> = grid
                .iter()
                .map(|(line, fair)| GridRow {
                    line,
                    home: fair.home(),
                    away: fair.away(),
                })
                .collect();
            print_json(&rows)?;
        }
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse input file: {}", path.display()))
}

fn read_curve(path: &Path) -> Result<LineCurve> {
    let points: Vec<CurvePoint> = read_json(path)?;
    Ok(LineCurve::from(points))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialise the `tracing` subscriber on stderr.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("handicap_ev=info"));

    let json_logging = std::env::var("HANDICAP_EV_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
