//! Long-format price CSV ingest.
//!
//! The source feed holds one `(date, ticker, price)` observation per line.
//! Rows are renamed through the [`UniverseConfig`], pivoted into a wide
//! [`PriceTable`] and sorted by date. Cells without an observation stay
//! undefined.

use std::{collections::BTreeSet, fs::File, io::Read, path::Path};

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tsmom_traits::{Date, PriceTable, TsmomError};

use crate::{DataError, Result, universe::UniverseConfig};

/// Date layouts accepted in the date column, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Column names of the long-format feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Observation date column (default: `DATE_`)
    pub date_column: String,
    /// Raw instrument label column (default: `TICKER`)
    pub instrument_column: String,
    /// Price level column (default: `PRICE`)
    pub price_column: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            date_column: "DATE_".to_string(),
            instrument_column: "TICKER".to_string(),
            price_column: "PRICE".to_string(),
        }
    }
}

/// Reads long-format price files into a [`PriceTable`].
///
/// # Example
///
/// ```ignore
/// use tsmom_data::{LoaderConfig, PriceLoader, UniverseConfig};
///
/// let loader = PriceLoader::new(LoaderConfig::default(), UniverseConfig::default());
/// let prices = loader.load_path("data.csv")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PriceLoader {
    config: LoaderConfig,
    universe: UniverseConfig,
}

impl PriceLoader {
    /// Create a loader.
    #[must_use]
    pub const fn new(config: LoaderConfig, universe: UniverseConfig) -> Self {
        Self { config, universe }
    }

    /// The rename table applied to raw labels.
    #[must_use]
    pub const fn universe(&self) -> &UniverseConfig {
        &self.universe
    }

    /// Load a CSV file.
    ///
    /// # Errors
    ///
    /// See [`load_reader`](Self::load_reader); also fails if the file cannot
    /// be opened.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<PriceTable> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "loading prices");
        self.load_reader(file)
    }

    /// Load CSV content from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::MissingColumn`] (wrapped in [`DataError::Core`])
    /// when a configured column is absent, [`DataError::MalformedInput`] for
    /// an unparseable date or price, and [`TsmomError::MalformedInput`] for a
    /// repeated `(date, instrument)` pair.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<PriceTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let date_idx = column_index(&headers, &self.config.date_column)?;
        let id_idx = column_index(&headers, &self.config.instrument_column)?;
        let price_idx = column_index(&headers, &self.config.price_column)?;

        let mut observations = Vec::new();
        let mut unknown: BTreeSet<String> = BTreeSet::new();
        let mut holes = 0usize;

        for (n, record) in reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let line = n + 2;

            let date = parse_date(field(&record, date_idx)).ok_or_else(|| {
                DataError::MalformedInput(format!(
                    "line {line}: unparseable date '{}'",
                    field(&record, date_idx)
                ))
            })?;

            let raw = field(&record, id_idx);
            if self.universe.canonical(raw).is_none() && unknown.insert(raw.to_string()) {
                warn!(label = raw, "instrument label not in rename table, keeping it as is");
            }

            let price = field(&record, price_idx);
            if price.is_empty() {
                holes += 1;
                continue;
            }
            let price: f64 = price.parse().map_err(|_| {
                DataError::MalformedInput(format!("line {line}: unparseable price '{price}'"))
            })?;

            observations.push((date, self.universe.rename(raw), price));
        }

        let table = PriceTable::from_long(observations)?;
        debug!(
            dates = table.len(),
            instruments = table.columns().len(),
            holes,
            "pivoted prices"
        );
        Ok(table)
    }
}

/// Parse a date in any of the accepted layouts.
pub fn parse_date(s: &str) -> Option<Date> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| Date::parse_from_str(s, fmt).ok())
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| TsmomError::MissingColumn(name.to_string()).into())
}

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}
