//! Ex-ante volatility from trailing daily excess returns.
//!
//! On every estimation date the engine hands the estimator the trailing
//! observations strictly before that date, so an estimate never sees the
//! return it is later used to scale. Daily estimates are then collapsed to
//! one value per calendar month.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tsmom_traits::{
    DailyPanel, Date, DecayWeights, ExcessReturns, MonthlyPanel, Result, TsmomError,
    VolatilityEstimator, Weighting,
};

/// Configuration for the EWMA volatility estimator and its engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityConfig {
    /// Decay parameter δ in `(0, 1)` (default: 0.94)
    pub decay: f64,
    /// Maximum number of trailing daily observations (default: 261)
    pub window: usize,
    /// Annualization factor applied to the daily variance (default: 261)
    pub periods_per_year: f64,
    /// First estimation date; earlier dates only feed the trailing window
    pub start: Option<Date>,
    /// Trailing observations required before an estimate is reported
    /// (default: 1)
    pub min_history: usize,
    /// How the decay weights are scaled (default: normalized)
    pub weighting: Weighting,
}

impl Default for VolatilityConfig {
    fn default() -> Self {
        Self {
            decay: 0.94,
            window: 261,
            periods_per_year: 261.0,
            start: None,
            min_history: 1,
            weighting: Weighting::Normalized,
        }
    }
}

impl VolatilityConfig {
    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::InvalidParameter`] for a decay outside `(0, 1)`,
    /// an empty window, a non-positive annualization factor, or a minimum
    /// history longer than the window.
    pub fn validate(&self) -> Result<()> {
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(TsmomError::InvalidParameter(format!(
                "decay must lie in (0, 1), got {}",
                self.decay
            )));
        }
        if self.window == 0 {
            return Err(TsmomError::InvalidParameter(
                "trailing window must hold at least one observation".to_string(),
            ));
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(TsmomError::InvalidParameter(format!(
                "periods per year must be positive, got {}",
                self.periods_per_year
            )));
        }
        if self.min_history > self.window {
            return Err(TsmomError::InvalidParameter(format!(
                "minimum history {} exceeds the trailing window {}",
                self.min_history, self.window
            )));
        }
        Ok(())
    }
}

/// Exponentially weighted volatility, annualized as
/// `sqrt(periods_per_year * variance)`.
#[derive(Debug, Clone)]
pub struct EwmaVolatility {
    config: VolatilityConfig,
    weights: DecayWeights,
}

impl EwmaVolatility {
    /// Create an estimator, precomputing the decay powers.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: VolatilityConfig) -> Result<Self> {
        config.validate()?;
        let weights = DecayWeights::new(config.decay, config.window, config.weighting)?;
        Ok(Self { config, weights })
    }

    /// The estimator's configuration.
    #[must_use]
    pub const fn config(&self) -> &VolatilityConfig {
        &self.config
    }

    /// Days after which an observation's weight has halved.
    pub fn half_life(&self) -> f64 {
        self.weights.half_life()
    }
}

impl VolatilityEstimator for EwmaVolatility {
    fn name(&self) -> &str {
        "ewma"
    }

    fn window(&self) -> usize {
        self.weights.capacity()
    }

    fn estimate(&self, trailing: &[f64]) -> Option<f64> {
        self.weights
            .moments(trailing)
            .map(|m| (self.config.periods_per_year * m.variance).sqrt())
    }
}

/// Point-in-time volatility per instrument and date.
///
/// # Example
///
/// ```ignore
/// use tsmom_signals::volatility::{VolatilityConfig, VolatilityEngine};
///
/// let engine = VolatilityEngine::new(VolatilityConfig::default())?;
/// let monthly = engine.monthly(&excess)?;
/// ```
#[derive(Debug, Clone)]
pub struct VolatilityEngine<E = EwmaVolatility> {
    estimator: E,
    start: Option<Date>,
    min_history: usize,
}

impl VolatilityEngine<EwmaVolatility> {
    /// EWMA engine with the warm-up settings taken from `config`.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: VolatilityConfig) -> Result<Self> {
        let (start, min_history) = (config.start, config.min_history);
        Ok(Self::with_estimator(EwmaVolatility::new(config)?, start, min_history))
    }
}

impl<E: VolatilityEstimator> VolatilityEngine<E> {
    /// Engine around any estimator.
    pub const fn with_estimator(estimator: E, start: Option<Date>, min_history: usize) -> Self {
        Self {
            estimator,
            start,
            min_history,
        }
    }

    /// The wrapped estimator.
    pub const fn estimator(&self) -> &E {
        &self.estimator
    }

    /// One estimate per date on or after the start date.
    ///
    /// The estimate on date `t` uses up to `window` finite returns strictly
    /// before `t`, and is undefined while fewer than `min_history` of them
    /// exist.
    pub fn daily(&self, excess: &ExcessReturns) -> Result<DailyPanel> {
        let dates = excess.index();
        let first = self.start.map_or(0, |s| dates.partition_point(|d| *d < s));
        let window = self.estimator.window();
        let required = self.min_history.max(1);

        let mut estimates =
            Array2::from_elem((dates.len() - first, excess.columns().len()), f64::NAN);
        for (j, returns) in excess.values().columns().into_iter().enumerate() {
            let mut history: Vec<f64> = Vec::with_capacity(returns.len());
            for (i, &r) in returns.iter().enumerate() {
                if i >= first && history.len() >= required {
                    let trailing = &history[history.len().saturating_sub(window)..];
                    if let Some(vol) = self.estimator.estimate(trailing) {
                        estimates[[i - first, j]] = vol;
                    }
                }
                if r.is_finite() {
                    history.push(r);
                }
            }
        }

        let daily = DailyPanel::new(dates[first..].to_vec(), excess.columns().to_vec(), estimates)?;
        debug!(
            estimator = self.estimator.name(),
            dates = daily.len(),
            skipped = first,
            "computed daily ex-ante volatility"
        );
        Ok(daily)
    }

    /// Daily estimates collapsed to the last defined value of each month.
    pub fn monthly(&self, excess: &ExcessReturns) -> Result<MonthlyPanel> {
        let monthly = self.daily(excess)?.month_end();
        debug!(months = monthly.len(), "collapsed ex-ante volatility to month end");
        Ok(monthly)
    }
}

/// Monthly EWMA volatility with the given decay and default settings
/// otherwise.
pub fn compute_ea_volatility(excess: &ExcessReturns, decay: f64) -> Result<MonthlyPanel> {
    let config = VolatilityConfig {
        decay,
        ..VolatilityConfig::default()
    };
    VolatilityEngine::new(config)?.monthly(excess)
}
