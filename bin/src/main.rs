//! tsmom CLI binary.
//!
//! Provides a command-line interface for time-series momentum signals and
//! ex-ante volatility.

mod cmd;
mod settings;

use std::{path::PathBuf, process};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tsmom_data::ExportFormat;
use tsmom_traits::Date;

use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "tsmom")]
#[command(about = "Time-series momentum with ex-ante volatility", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true, env = "TSMOM_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lookback and holding returns per month
    Momentum {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        horizons: HorizonArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Monthly (or daily) ex-ante volatility
    Volatility {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        volatility: VolatilityArgs,

        /// Report every trading date instead of month ends
        #[arg(long, conflicts_with = "store")]
        daily: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Momentum joined with ex-ante volatility
    Signals {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        horizons: HorizonArgs,

        #[command(flatten)]
        volatility: VolatilityArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the configured universe and rename table
    Universe,
}

#[derive(Args)]
struct InputArgs {
    /// Long-format price CSV (date, ticker, price)
    input: PathBuf,
}

#[derive(Args)]
struct HorizonArgs {
    /// Lookback horizon in months
    #[arg(short, long)]
    lookback: Option<u32>,

    /// Holding horizon in months
    #[arg(short = 'H', long)]
    holding: Option<u32>,
}

#[derive(Args)]
struct VolatilityArgs {
    /// Decay parameter in (0, 1)
    #[arg(short, long)]
    decay: Option<f64>,

    /// First estimation date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<Date>,

    /// Cache monthly volatility in this CSV file
    #[arg(long)]
    store: Option<PathBuf>,

    /// Recompute even if the store already holds a table
    #[arg(long, requires = "store")]
    refresh: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (csv or json)
    #[arg(short, long, default_value = "csv")]
    format: ExportFormat,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Momentum {
            input,
            horizons,
            output,
        } => {
            cmd::momentum::run(&settings, &input.input, &horizons, &output)?;
        }
        Commands::Volatility {
            input,
            volatility,
            daily,
            output,
        } => {
            cmd::volatility::run(&settings, &input.input, &volatility, daily, &output)?;
        }
        Commands::Signals {
            input,
            horizons,
            volatility,
            output,
        } => {
            cmd::signals::run(&settings, &input.input, &horizons, &volatility, &output)?;
        }
        Commands::Universe => {
            cmd::universe::run(&settings)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
