//! Data adapters for the tsmom engines.
//!
//! This crate sits at the edges of the pipeline:
//! - [`loader`]: long-format price CSV into a [`PriceTable`](tsmom_traits::PriceTable)
//! - [`universe`]: instrument universe and raw-label rename table
//! - [`store`]: cached monthly ex-ante volatility
//! - [`export`]: CSV/JSON output and monthly CSV read-back
//!
//! # Usage
//!
//! ```rust,ignore
//! use tsmom_data::{CsvVolatilityStore, PriceLoader, load_or_compute};
//!
//! let prices = PriceLoader::default().load_path("prices.csv")?;
//! let mut store = CsvVolatilityStore::new("ea_vol.csv");
//! let vol = load_or_compute(&mut store, false, &config, || engine.monthly(&excess))?;
//! ```

mod error;
pub mod export;
pub mod loader;
pub mod store;
pub mod universe;

pub use error::DataError;
pub use export::{
    ExportFormat, read_monthly_panel, read_monthly_panel_path, write_panel, write_panel_to_path,
    write_records,
};
pub use loader::{LoaderConfig, PriceLoader, parse_date};
pub use store::{CsvVolatilityStore, MemoryVolatilityStore, VolatilityStore, load_or_compute};
pub use universe::{InstrumentMapping, UniverseConfig};

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
