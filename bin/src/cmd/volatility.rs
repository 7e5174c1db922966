//! Volatility command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tsmom_data::{CsvVolatilityStore, load_or_compute};
use tsmom_signals::{VolatilityEngine, excess_returns};
use tsmom_traits::VolatilityEstimator;

use super::{StoreKey, emit_panel, load_prices, volatility_config};
use crate::{OutputArgs, VolatilityArgs, settings::Settings};

/// Estimate ex-ante volatility, through the store when one is given.
pub(crate) fn run(
    settings: &Settings,
    input: &Path,
    args: &VolatilityArgs,
    daily: bool,
    out: &OutputArgs,
) -> Result<()> {
    let config = volatility_config(settings, args)?;
    let engine = VolatilityEngine::new(config)?;
    info!(
        estimator = engine.estimator().name(),
        decay = engine.estimator().config().decay,
        half_life = engine.estimator().half_life(),
        "volatility estimator ready"
    );

    if daily {
        let (prices, universe) = load_prices(settings, input)?;
        let excess = excess_returns(&prices, &universe)?;
        return emit_panel(&engine.daily(&excess)?, out);
    }

    let monthly = match &args.store {
        Some(path) => {
            let mut store = CsvVolatilityStore::new(path);
            let key = StoreKey::new(settings, input, engine.estimator().config());
            load_or_compute(&mut store, args.refresh, &key, || {
                let (prices, universe) = load_prices(settings, input)
                    .map_err(|e| tsmom_traits::TsmomError::Other(format!("{e:#}")))?;
                engine.monthly(&excess_returns(&prices, &universe)?)
            })
            .with_context(|| format!("volatility store {}", path.display()))?
        }
        None => {
            let (prices, universe) = load_prices(settings, input)?;
            engine.monthly(&excess_returns(&prices, &universe)?)?
        }
    };

    emit_panel(&monthly, out)
}
