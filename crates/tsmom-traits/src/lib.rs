#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tsmom/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the tsmom research workspace.
//!
//! This crate provides the keys, tables and weighted statistics shared by the
//! momentum and ex-ante volatility engines.

/// The version of the tsmom-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod estimator;
pub mod frame;
pub mod panel;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, TsmomError};
pub use estimator::VolatilityEstimator;
pub use frame::FrameKey;
pub use panel::{DailyPanel, ExcessReturns, MonthKey, MonthlyPanel, Panel, PanelKey, PriceTable};
pub use stats::{DecayWeights, WeightedMoments, Weighting};
pub use types::{Date, InstrumentId, Months, Universe, YearMonth};
