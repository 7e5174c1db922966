//! Time-series momentum and ex-ante volatility engines.
//!
//! This crate turns a price table into the two research outputs:
//! - Momentum: month-end cumulative excess returns compared over a lookback
//!   and a holding horizon
//! - Ex-ante volatility: exponentially weighted, annualized volatility from
//!   daily excess returns strictly before each estimation date
//!
//! Both start from the same daily excess returns and meet again in the
//! joined [`SignalTable`].
//!
//! # Example
//!
//! ```ignore
//! use tsmom_signals::{MomentumEngine, VolatilityEngine, excess_returns};
//!
//! let pair = MomentumEngine::default().compute(&prices, &universe)?;
//! let excess = excess_returns(&prices, &universe)?;
//! let vol = VolatilityEngine::new(Default::default())?.monthly(&excess)?;
//! let table = SignalTable::join(&pair, &vol);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod momentum;
pub mod panel;
pub mod returns;
pub mod volatility;

// Re-export key types
pub use momentum::{MomentumConfig, MomentumEngine, MomentumPair, compute_momentum};
pub use panel::{SignalRow, SignalTable};
pub use returns::{cumulative, excess_returns, monthly_cumulative};
pub use volatility::{EwmaVolatility, VolatilityConfig, VolatilityEngine, compute_ea_volatility};
