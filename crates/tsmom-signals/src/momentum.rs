//! Lookback-horizon momentum evaluated at a holding horizon.
//!
//! Both horizons are ratios of month-end cumulative excess returns:
//! `cum[t] / cum[t - h] - 1`. A month enters the output only if its calendar
//! predecessor `t - lookback` is present in the monthly series, and the
//! holding returns are reported on exactly that month set.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsmom_traits::{MonthlyPanel, Months, PriceTable, Result, Universe, YearMonth};

use crate::returns::monthly_cumulative;

/// Configuration for the momentum engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Months over which the momentum signal is formed (default: 12)
    pub lookback: Months,
    /// Months over which the signal is evaluated (default: 1)
    pub holding: Months,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            lookback: Months::TWELVE,
            holding: Months::ONE,
        }
    }
}

/// Lookback and holding returns on a shared month index.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumPair {
    lookback: Months,
    holding: Months,
    lookback_returns: MonthlyPanel,
    holding_returns: MonthlyPanel,
}

impl MomentumPair {
    /// Lookback horizon.
    #[must_use]
    pub const fn lookback(&self) -> Months {
        self.lookback
    }

    /// Holding horizon.
    #[must_use]
    pub const fn holding(&self) -> Months {
        self.holding
    }

    /// `cum[t] / cum[t - lookback] - 1` per month and instrument.
    #[must_use]
    pub const fn lookback_returns(&self) -> &MonthlyPanel {
        &self.lookback_returns
    }

    /// `cum[t] / cum[t - holding] - 1` per month and instrument. Undefined
    /// where month `t - holding` is missing from the series.
    #[must_use]
    pub const fn holding_returns(&self) -> &MonthlyPanel {
        &self.holding_returns
    }

    /// The month index shared by both tables.
    pub fn months(&self) -> &[YearMonth] {
        self.lookback_returns.index()
    }

    /// Whether no month has a full lookback window.
    pub fn is_empty(&self) -> bool {
        self.lookback_returns.is_empty()
    }
}

/// Time-series momentum over month-end cumulative excess returns.
///
/// # Example
///
/// ```ignore
/// use tsmom_signals::momentum::{MomentumConfig, MomentumEngine};
///
/// let engine = MomentumEngine::new(MomentumConfig::default());
/// let pair = engine.compute(&prices, &universe)?;
/// println!("{} months", pair.months().len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MomentumEngine {
    config: MomentumConfig,
}

impl MomentumEngine {
    /// Create an engine with the given horizons.
    #[must_use]
    pub const fn new(config: MomentumConfig) -> Self {
        Self { config }
    }

    /// The engine's horizons.
    #[must_use]
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Excess returns, compounding, month-end resampling and horizon ratios
    /// in one pass over `prices`.
    ///
    /// # Errors
    ///
    /// Fails if the reference rate or every universe instrument is missing.
    pub fn compute(&self, prices: &PriceTable, universe: &Universe) -> Result<MomentumPair> {
        let cumulative = monthly_cumulative(prices, universe)?;
        self.from_cumulative(&cumulative)
    }

    /// Horizon ratios over an existing month-end cumulative series.
    pub fn from_cumulative(&self, cumulative: &MonthlyPanel) -> Result<MomentumPair> {
        let MomentumConfig { lookback, holding } = self.config;
        let months = cumulative.index();
        let cum = cumulative.values();

        // (row, lookback base row)
        let valid: Vec<(usize, usize)> = months
            .iter()
            .enumerate()
            .filter_map(|(i, t)| cumulative.position(&t.back(lookback)).map(|b| (i, b)))
            .collect();

        let width = cumulative.columns().len();
        let mut lookback_values = Array2::from_elem((valid.len(), width), f64::NAN);
        let mut holding_values = Array2::from_elem((valid.len(), width), f64::NAN);

        for (k, &(i, base)) in valid.iter().enumerate() {
            let holding_base = cumulative.position(&months[i].back(holding));
            for j in 0..width {
                lookback_values[[k, j]] = cum[[i, j]] / cum[[base, j]] - 1.0;
                if let Some(hb) = holding_base {
                    holding_values[[k, j]] = cum[[i, j]] / cum[[hb, j]] - 1.0;
                }
            }
        }

        let index: Vec<YearMonth> = valid.iter().map(|&(i, _)| months[i]).collect();
        debug!(
            months = months.len(),
            valid = index.len(),
            %lookback,
            %holding,
            "computed momentum horizons"
        );

        Ok(MomentumPair {
            lookback,
            holding,
            lookback_returns: MonthlyPanel::new(
                index.clone(),
                cumulative.columns().to_vec(),
                lookback_values,
            )?,
            holding_returns: MonthlyPanel::new(
                index,
                cumulative.columns().to_vec(),
                holding_values,
            )?,
        })
    }
}

/// Momentum with explicit horizons; see [`MomentumEngine::compute`].
pub fn compute_momentum(
    prices: &PriceTable,
    universe: &Universe,
    lookback: Months,
    holding: Months,
) -> Result<MomentumPair> {
    MomentumEngine::new(MomentumConfig { lookback, holding }).compute(prices, universe)
}
