//! CLI subcommand modules.
//!
//! This module contains the implementations for all tsmom CLI subcommands
//! and the input/output plumbing they share.

pub(crate) mod momentum;
pub(crate) mod signals;
pub(crate) mod universe;
pub(crate) mod volatility;

use std::{
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tsmom_data::{
    LoaderConfig, PriceLoader, UniverseConfig, write_panel, write_panel_to_path, write_records,
};
use tsmom_signals::{MomentumConfig, VolatilityConfig};
use tsmom_traits::{FrameKey, Months, Panel, PriceTable, Universe};

use crate::{HorizonArgs, OutputArgs, VolatilityArgs, settings::Settings};

/// Rows shown when a table is written to a file.
const PREVIEW_ROWS: usize = 6;

/// Load the price file and resolve the universe.
pub(crate) fn load_prices(settings: &Settings, input: &Path) -> Result<(PriceTable, Universe)> {
    let loader = PriceLoader::new(settings.loader.clone(), settings.universe.clone());
    let prices = loader
        .load_path(input)
        .with_context(|| format!("failed to load prices from {}", input.display()))?;
    let universe = settings.universe.universe()?;
    info!(
        dates = prices.len(),
        instruments = universe.len(),
        "loaded price table"
    );
    Ok((prices, universe))
}

/// Momentum horizons with command-line overrides applied.
pub(crate) fn momentum_config(settings: &Settings, args: &HorizonArgs) -> Result<MomentumConfig> {
    let mut config = settings.momentum;
    if let Some(lookback) = args.lookback {
        config.lookback = Months::new(lookback)?;
    }
    if let Some(holding) = args.holding {
        config.holding = Months::new(holding)?;
    }
    Ok(config)
}

/// Volatility settings with command-line overrides applied.
pub(crate) fn volatility_config(
    settings: &Settings,
    args: &VolatilityArgs,
) -> Result<VolatilityConfig> {
    let mut config = settings.volatility.clone();
    if let Some(decay) = args.decay {
        config.decay = decay;
    }
    if args.start.is_some() {
        config.start = args.start;
    }
    config.validate()?;
    Ok(config)
}

/// Everything a stored volatility table depends on.
#[derive(Debug, Serialize)]
pub(crate) struct StoreKey<'a> {
    input: &'a Path,
    loader: &'a LoaderConfig,
    universe: &'a UniverseConfig,
    volatility: &'a VolatilityConfig,
}

impl<'a> StoreKey<'a> {
    pub(crate) const fn new(
        settings: &'a Settings,
        input: &'a Path,
        volatility: &'a VolatilityConfig,
    ) -> Self {
        Self {
            input,
            loader: &settings.loader,
            universe: &settings.universe,
            volatility,
        }
    }
}

/// Write a wide panel to the output file or stdout.
pub(crate) fn emit_panel<K: FrameKey>(panel: &Panel<K>, out: &OutputArgs) -> Result<()> {
    match &out.output {
        Some(path) => {
            write_panel_to_path(panel, out.format, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = panel.len(), "wrote table");
            let frame = panel.to_frame()?;
            println!("{}", frame.tail(Some(PREVIEW_ROWS)));
        }
        None => write_panel(panel, out.format, io::stdout().lock())?,
    }
    Ok(())
}

/// Write long-format rows to the output file or stdout.
pub(crate) fn emit_records<T: Serialize>(rows: &[T], out: &OutputArgs) -> Result<()> {
    match &out.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = io::BufWriter::new(file);
            write_records(rows, out.format, &mut writer)?;
            writer.flush()?;
            info!(path = %path.display(), rows = rows.len(), "wrote table");
        }
        None => write_records(rows, out.format, io::stdout().lock())?,
    }
    Ok(())
}
