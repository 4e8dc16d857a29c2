//! SignalLab CLI: signal, risk and scan commands over CSV price history.
//!
//! Commands:
//! - `signal`: compute one signal from a CSV of bars and print it as JSON
//! - `risk`: compute a signal, then run the Monte Carlo simulation on it
//! - `scan`: compute signals for many CSV files in parallel, one JSON line each
//!
//! Results go to stdout, logs to stderr.

mod bars;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use signallab_core::{Signal, SignalEngine, Timeframe};
use signallab_risk::{MonteCarloSimulator, RiskReport, SimulationConfig};

use crate::bars::{load_bars, symbol_from_path};
use crate::config::AppConfig;
use crate::logging::init_logging;

#[derive(Parser)]
#[command(
    name = "signallab",
    about = "SignalLab CLI: technical signals and Monte Carlo risk from CSV price history"
)]
struct Cli {
    /// Path to a TOML config file with engine, simulation and logging sections.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a signal from a CSV of bars.
    Signal {
        /// CSV file with timestamp,open,high,low,close,volume columns.
        #[arg(long)]
        bars: PathBuf,

        /// Symbol. Defaults to the file name without extension.
        #[arg(long)]
        symbol: Option<String>,

        /// Bar timeframe (1m, 5m, 15m, 30m, 1h, 4h, 1d, 3d, 1w, 1M).
        #[arg(long)]
        timeframe: Timeframe,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Compute a signal and simulate its stop/target outcome.
    Risk {
        /// CSV file with timestamp,open,high,low,close,volume columns.
        #[arg(long)]
        bars: PathBuf,

        /// Symbol. Defaults to the file name without extension.
        #[arg(long)]
        symbol: Option<String>,

        /// Bar timeframe (1m, 5m, 15m, 30m, 1h, 4h, 1d, 3d, 1w, 1M).
        #[arg(long)]
        timeframe: Timeframe,

        /// Simulated paths. Overrides the config file.
        #[arg(long)]
        iterations: Option<usize>,

        /// Steps per path. Overrides the config file.
        #[arg(long)]
        steps: Option<usize>,

        /// Master seed for reproducible runs. Overrides the config file.
        #[arg(long)]
        seed: Option<u64>,

        /// Horizon log-return volatility. Defaults to the signal's per-bar
        /// volatility scaled by the square root of the step count.
        #[arg(long)]
        volatility: Option<f64>,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Compute signals for several CSV files, one JSON line per file.
    Scan {
        /// Bar timeframe shared by every file.
        #[arg(long)]
        timeframe: Timeframe,

        /// CSV files; each file name (without extension) is the symbol.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let app = AppConfig::load(cli.config.as_deref())?;
    init_logging(&app.logging)?;

    match cli.command {
        Commands::Signal {
            bars,
            symbol,
            timeframe,
            pretty,
        } => {
            let signal = run_signal(&app, &bars, symbol, timeframe)?;
            print_json(&signal, pretty)
        }
        Commands::Risk {
            bars,
            symbol,
            timeframe,
            iterations,
            steps,
            seed,
            volatility,
            pretty,
        } => {
            let overrides = SimulationOverrides {
                iterations,
                steps,
                seed,
                volatility,
            };
            let output = run_risk(&app, &bars, symbol, timeframe, &overrides)?;
            print_json(&output, pretty)
        }
        Commands::Scan { timeframe, files } => {
            for line in run_scan(&app, &files, timeframe)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn build_engine(app: &AppConfig) -> Result<SignalEngine> {
    SignalEngine::new(app.engine.clone()).context("invalid engine configuration")
}

fn resolve_symbol(path: &Path, symbol: Option<String>) -> Result<String> {
    match symbol {
        Some(s) => Ok(s),
        None => symbol_from_path(path),
    }
}

fn signal_for_file(
    engine: &SignalEngine,
    path: &Path,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<Signal> {
    let bars = load_bars(path)?;
    engine
        .compute_signal(symbol, timeframe, bars)
        .with_context(|| format!("cannot compute {symbol} {timeframe} signal"))
}

fn run_signal(
    app: &AppConfig,
    path: &Path,
    symbol: Option<String>,
    timeframe: Timeframe,
) -> Result<Signal> {
    let engine = build_engine(app)?;
    let symbol = resolve_symbol(path, symbol)?;
    let signal = signal_for_file(&engine, path, &symbol, timeframe)?;
    info!(
        symbol = %signal.symbol,
        direction = %signal.direction,
        confidence = signal.confidence,
        "signal computed"
    );
    Ok(signal)
}

/// Command-line values that take precedence over the `[simulation]` section.
#[derive(Debug, Default)]
struct SimulationOverrides {
    iterations: Option<usize>,
    steps: Option<usize>,
    seed: Option<u64>,
    volatility: Option<f64>,
}

impl SimulationOverrides {
    fn apply(&self, base: &SimulationConfig) -> SimulationConfig {
        let mut config = base.clone();
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(steps) = self.steps {
            config.steps = steps;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

#[derive(Debug, Serialize)]
struct RiskOutput {
    signal: Signal,
    volatility: f64,
    risk: RiskReport,
}

fn run_risk(
    app: &AppConfig,
    path: &Path,
    symbol: Option<String>,
    timeframe: Timeframe,
    overrides: &SimulationOverrides,
) -> Result<RiskOutput> {
    let signal = run_signal(app, path, symbol, timeframe)?;
    let sim_config = overrides.apply(&app.simulation);
    let volatility = overrides
        .volatility
        .unwrap_or_else(|| signal.indicators.volatility * (sim_config.steps as f64).sqrt());

    let simulator = MonteCarloSimulator::new(sim_config)?;
    let risk = simulator
        .run(&signal, volatility)
        .with_context(|| format!("cannot simulate {} {} signal", signal.symbol, signal.direction))?;
    Ok(RiskOutput {
        signal,
        volatility,
        risk,
    })
}

#[derive(Debug, Serialize)]
struct ScanFailure {
    file: String,
    error: String,
}

/// One JSON line per file, in input order. A file that fails produces a
/// failure line instead of aborting the scan.
fn run_scan(app: &AppConfig, files: &[PathBuf], timeframe: Timeframe) -> Result<Vec<String>> {
    let engine = build_engine(app)?;
    let lines: Vec<String> = files
        .par_iter()
        .map(|path| {
            let outcome = symbol_from_path(path)
                .and_then(|symbol| signal_for_file(&engine, path, &symbol, timeframe));
            match outcome {
                Ok(signal) => serde_json::to_string(&signal),
                Err(e) => {
                    warn!(file = %path.display(), error = %format!("{e:#}"), "scan entry failed");
                    serde_json::to_string(&ScanFailure {
                        file: path.display().to_string(),
                        error: format!("{e:#}"),
                    })
                }
            }
        })
        .collect::<Result<_, _>>()?;

    info!(files = files.len(), "scan complete");
    Ok(lines)
}
