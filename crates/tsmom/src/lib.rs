#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tsmom/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Quick Start
//!
//! ```ignore
//! use tsmom::{MomentumEngine, PriceLoader, SignalTable, VolatilityEngine, excess_returns};
//!
//! # fn main() -> anyhow::Result<()> {
//! let loader = PriceLoader::default();
//! let prices = loader.load_path("prices.csv")?;
//! let universe = loader.universe().universe()?;
//!
//! let momentum = MomentumEngine::default().compute(&prices, &universe)?;
//! let excess = excess_returns(&prices, &universe)?;
//! let volatility = VolatilityEngine::new(Default::default())?.monthly(&excess)?;
//!
//! let table = SignalTable::join(&momentum, &volatility);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Core Types
// ============================================================================

/// Keys, panels, errors and weighted statistics.
pub mod traits {
    pub use tsmom_traits::*;
}

pub use tsmom_traits::{
    DailyPanel, Date, InstrumentId, MonthlyPanel, Months, Panel, PriceTable, Result, TsmomError,
    Universe, VolatilityEstimator, Weighting, YearMonth,
};

// ============================================================================
// Engines
// ============================================================================

/// Momentum and ex-ante volatility engines.
pub mod signals {
    pub use tsmom_signals::*;
}

pub use tsmom_signals::{
    EwmaVolatility, MomentumConfig, MomentumEngine, MomentumPair, SignalRow, SignalTable,
    VolatilityConfig, VolatilityEngine, compute_ea_volatility, compute_momentum, excess_returns,
};

// ============================================================================
// Data Adapters
// ============================================================================

/// Loading, storage and export.
pub mod data {
    pub use tsmom_data::*;
}

pub use tsmom_data::{
    CsvVolatilityStore, DataError, ExportFormat, LoaderConfig, MemoryVolatilityStore,
    PriceLoader, UniverseConfig, VolatilityStore, load_or_compute,
};

/// The version of the tsmom crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_default_configs_line_up() {
        let momentum = MomentumConfig::default();
        let volatility = VolatilityConfig::default();
        assert_eq!(momentum.lookback, Months::TWELVE);
        assert_eq!(volatility.window, 261);
        assert_eq!(UniverseConfig::default().universe().unwrap().len(), 6);
    }
}
