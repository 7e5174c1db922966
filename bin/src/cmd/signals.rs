//! Signals command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tsmom_data::{CsvVolatilityStore, load_or_compute};
use tsmom_signals::{MomentumEngine, SignalTable, VolatilityEngine, excess_returns};

use super::{StoreKey, emit_records, load_prices, momentum_config, volatility_config};
use crate::{HorizonArgs, OutputArgs, VolatilityArgs, settings::Settings};

/// Join momentum with monthly ex-ante volatility.
pub(crate) fn run(
    settings: &Settings,
    input: &Path,
    horizons: &HorizonArgs,
    args: &VolatilityArgs,
    out: &OutputArgs,
) -> Result<()> {
    let horizons = momentum_config(settings, horizons)?;
    let engine = VolatilityEngine::new(volatility_config(settings, args)?)?;
    let (prices, universe) = load_prices(settings, input)?;

    let momentum = MomentumEngine::new(horizons).compute(&prices, &universe)?;
    let excess = excess_returns(&prices, &universe)?;

    let volatility = match &args.store {
        Some(path) => {
            let mut store = CsvVolatilityStore::new(path);
            let key = StoreKey::new(settings, input, engine.estimator().config());
            load_or_compute(&mut store, args.refresh, &key, || engine.monthly(&excess))
                .with_context(|| format!("volatility store {}", path.display()))?
        }
        None => engine.monthly(&excess)?,
    };

    let table = SignalTable::join(&momentum, &volatility);
    let with_vol = table
        .rows()
        .iter()
        .filter(|r| r.ex_ante_volatility.is_some())
        .count();
    info!(
        rows = table.len(),
        with_volatility = with_vol,
        "joined momentum and ex-ante volatility"
    );

    emit_records(table.rows(), out)
}
