//! Momentum joined with ex-ante volatility on the month key.

use serde::{Deserialize, Serialize};
use tsmom_traits::{InstrumentId, MonthlyPanel, YearMonth};

use crate::momentum::MomentumPair;

/// One month and instrument of the joined signal panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    /// Calendar month.
    pub month: YearMonth,
    /// Instrument identifier.
    pub instrument: InstrumentId,
    /// Return over the lookback horizon ending in `month`.
    pub lookback_return: Option<f64>,
    /// Return over the holding horizon ending in `month`.
    pub holding_return: Option<f64>,
    /// Ex-ante volatility for `month`, if one was estimated.
    pub ex_ante_volatility: Option<f64>,
}

/// Long-format signal panel, ordered by month then by instrument as they
/// appear in the momentum tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalTable {
    rows: Vec<SignalRow>,
}

impl SignalTable {
    /// Join `momentum` with `volatility` on month and instrument.
    ///
    /// Every month of the momentum index produces one row per instrument.
    /// Months or instruments absent from `volatility` carry no volatility.
    pub fn join(momentum: &MomentumPair, volatility: &MonthlyPanel) -> Self {
        let lookback = momentum.lookback_returns();
        let holding = momentum.holding_returns();

        let rows = momentum
            .months()
            .iter()
            .flat_map(|month| {
                lookback.columns().iter().map(move |id| SignalRow {
                    month: *month,
                    instrument: id.clone(),
                    lookback_return: lookback.get(month, id),
                    holding_return: holding.get(month, id),
                    ex_ante_volatility: volatility.get(month, id),
                })
            })
            .collect();

        Self { rows }
    }

    /// All rows.
    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one instrument.
    pub fn instrument<'a>(&'a self, id: &'a InstrumentId) -> impl Iterator<Item = &'a SignalRow> {
        self.rows.iter().filter(move |r| &r.instrument == id)
    }
}

impl IntoIterator for SignalTable {
    type Item = SignalRow;
    type IntoIter = std::vec::IntoIter<SignalRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
