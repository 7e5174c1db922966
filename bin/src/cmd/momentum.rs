//! Momentum command implementation.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};
use tsmom_signals::{MomentumEngine, MomentumPair};
use tsmom_traits::{InstrumentId, YearMonth};

use super::{emit_records, load_prices, momentum_config};
use crate::{HorizonArgs, OutputArgs, settings::Settings};

/// One month and instrument of momentum output.
#[derive(Debug, Serialize)]
struct MomentumRow<'a> {
    month: YearMonth,
    instrument: &'a InstrumentId,
    lookback_return: Option<f64>,
    holding_return: Option<f64>,
}

/// Compute lookback and holding returns for the configured universe.
pub(crate) fn run(
    settings: &Settings,
    input: &Path,
    horizons: &HorizonArgs,
    out: &OutputArgs,
) -> Result<()> {
    let config = momentum_config(settings, horizons)?;
    let (prices, universe) = load_prices(settings, input)?;

    let pair = MomentumEngine::new(config).compute(&prices, &universe)?;
    if pair.is_empty() {
        warn!(
            lookback = %config.lookback,
            "no month has a full lookback window, output is empty"
        );
    } else {
        info!(
            months = pair.months().len(),
            first = %pair.months()[0],
            lookback = %config.lookback,
            holding = %config.holding,
            "computed momentum"
        );
    }

    emit_records(&rows(&pair), out)
}

fn rows(pair: &MomentumPair) -> Vec<MomentumRow<'_>> {
    let lookback = pair.lookback_returns();
    let holding = pair.holding_returns();
    pair.months()
        .iter()
        .flat_map(|month| {
            lookback.columns().iter().map(move |id| MomentumRow {
                month: *month,
                instrument: id,
                lookback_return: lookback.get(month, id),
                holding_return: holding.get(month, id),
            })
        })
        .collect()
}
