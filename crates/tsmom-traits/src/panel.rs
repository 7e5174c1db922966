//! Date- or month-indexed panels of per-instrument values.
//!
//! A [`Panel`] is an ordered index of keys (trading dates or calendar months),
//! an ordered list of instrument columns, and a dense `f64` matrix. Undefined
//! cells are stored as `NaN` and surface as `None` through [`Panel::get`], so a
//! missing estimate is never confused with a zero.

use std::{collections::HashMap, fmt};

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::warn;

use crate::{Date, InstrumentId, Result, TsmomError, YearMonth};

/// Keys a panel can be indexed by.
pub trait PanelKey: Copy + Ord + std::hash::Hash + fmt::Debug + fmt::Display + MonthKey {}

impl PanelKey for Date {}
impl PanelKey for YearMonth {}

/// An immutable table of values keyed by `K` and instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel<K> {
    index: Vec<K>,
    columns: Vec<InstrumentId>,
    values: Array2<f64>,
}

/// Daily table keyed by trading date.
pub type DailyPanel = Panel<Date>;

/// Monthly table keyed by calendar month.
pub type MonthlyPanel = Panel<YearMonth>;

/// Price levels per trading date, including the reference-rate column.
pub type PriceTable = Panel<Date>;

/// Daily excess-of-reference-rate simple returns.
pub type ExcessReturns = Panel<Date>;

impl<K: PanelKey> Panel<K> {
    /// Create a panel.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::MalformedInput`] if the matrix shape does not match
    /// the index and columns, if the index is not strictly increasing, or if a
    /// column name repeats.
    pub fn new(index: Vec<K>, columns: Vec<InstrumentId>, values: Array2<f64>) -> Result<Self> {
        if values.dim() != (index.len(), columns.len()) {
            return Err(TsmomError::MalformedInput(format!(
                "values have shape {:?}, expected ({}, {})",
                values.dim(),
                index.len(),
                columns.len()
            )));
        }
        if let Some(w) = index.windows(2).find(|w| w[0] >= w[1]) {
            return Err(TsmomError::MalformedInput(format!(
                "index must be strictly increasing: {} is followed by {}",
                w[0], w[1]
            )));
        }
        for (i, id) in columns.iter().enumerate() {
            if columns[..i].contains(id) {
                return Err(TsmomError::MalformedInput(format!("duplicate column '{id}'")));
            }
        }
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    /// A panel with the given columns and no rows.
    pub fn empty(columns: Vec<InstrumentId>) -> Self {
        let width = columns.len();
        Self {
            index: Vec::new(),
            columns,
            values: Array2::zeros((0, width)),
        }
    }

    /// Build a wide panel from long `(key, instrument, value)` observations.
    ///
    /// Rows are sorted by key and columns by identifier. Cells without an
    /// observation are left undefined.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::MalformedInput`] on a duplicate `(key, instrument)`
    /// pair.
    pub fn from_long<I>(observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, InstrumentId, f64)>,
    {
        let mut cells: HashMap<(K, InstrumentId), f64> = HashMap::new();
        let mut index = Vec::new();
        let mut columns = Vec::new();

        for (key, id, value) in observations {
            index.push(key);
            columns.push(id.clone());
            if cells.insert((key, id.clone()), value).is_some() {
                return Err(TsmomError::MalformedInput(format!(
                    "duplicate observation for ({key}, {id})"
                )));
            }
        }

        index.sort_unstable();
        index.dedup();
        columns.sort();
        columns.dedup();

        let mut values = Array2::from_elem((index.len(), columns.len()), f64::NAN);
        let col_pos: HashMap<&InstrumentId, usize> =
            columns.iter().enumerate().map(|(j, id)| (id, j)).collect();
        for ((key, id), value) in &cells {
            if let (Ok(i), Some(&j)) = (index.binary_search(key), col_pos.get(id)) {
                values[[i, j]] = *value;
            }
        }

        Self::new(index, columns, values)
    }

    /// Row keys in ascending order.
    pub fn index(&self) -> &[K] {
        &self.index
    }

    /// Column identifiers.
    pub fn columns(&self) -> &[InstrumentId] {
        &self.columns
    }

    /// The underlying `rows x columns` matrix; undefined cells are `NaN`.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row position of `key`.
    pub fn position(&self, key: &K) -> Option<usize> {
        self.index.binary_search(key).ok()
    }

    /// Column position of `id`.
    pub fn column_position(&self, id: &InstrumentId) -> Option<usize> {
        self.columns.iter().position(|c| c == id)
    }

    /// Value at `(key, id)`, or `None` if the cell is absent or undefined.
    pub fn get(&self, key: &K, id: &InstrumentId) -> Option<f64> {
        let i = self.position(key)?;
        let j = self.column_position(id)?;
        let value = self.values[[i, j]];
        (!value.is_nan()).then_some(value)
    }

    /// Column for `id`, in index order.
    pub fn column(&self, id: &InstrumentId) -> Option<ArrayView1<'_, f64>> {
        self.column_position(id).map(|j| self.values.column(j))
    }

    /// Iterate over `(key, row)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (&K, ArrayView1<'_, f64>)> {
        self.index.iter().zip(self.values.rows())
    }

    /// Keep only rows whose key appears in `keys`, in index order.
    pub fn select_rows(&self, keys: &[K]) -> Self {
        let mut positions: Vec<usize> = keys.iter().filter_map(|k| self.position(k)).collect();
        positions.sort_unstable();
        positions.dedup();
        self.take_rows(&positions)
    }

    /// Drop every row that holds at least one undefined or infinite cell.
    pub fn drop_incomplete_rows(&self) -> Self {
        self.filter_positions(|row| row.iter().all(|v| v.is_finite()))
    }

    /// Restrict to `ids`, in the order given.
    ///
    /// Identifiers absent from the panel are skipped with a warning and
    /// returned alongside the restricted panel.
    pub fn select_columns(&self, ids: &[InstrumentId]) -> (Self, Vec<InstrumentId>) {
        let mut positions = Vec::with_capacity(ids.len());
        let mut columns = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for id in ids {
            match self.column_position(id) {
                Some(j) => {
                    positions.push(j);
                    columns.push(id.clone());
                }
                None => {
                    warn!(instrument = %id, "instrument not present in panel, excluding it");
                    missing.push(id.clone());
                }
            }
        }
        let panel = Self {
            index: self.index.clone(),
            columns,
            values: self.values.select(Axis(1), &positions),
        };
        (panel, missing)
    }

    /// Same index and columns with a new matrix.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::MalformedInput`] if the shape differs.
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        if values.dim() != self.values.dim() {
            return Err(TsmomError::MalformedInput(format!(
                "values have shape {:?}, expected {:?}",
                values.dim(),
                self.values.dim()
            )));
        }
        Ok(Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            values,
        })
    }

    /// Collapse rows into calendar months, keeping per column the last defined
    /// value within each month.
    ///
    /// A month in which a column never has a defined value keeps that cell
    /// undefined.
    pub fn month_end(&self) -> MonthlyPanel {
        let mut months: Vec<YearMonth> = Vec::new();
        let mut rows: Vec<Array1<f64>> = Vec::new();

        for (key, row) in self.rows() {
            let month = key.month_key();
            if months.last() != Some(&month) {
                months.push(month);
                rows.push(Array1::from_elem(self.columns.len(), f64::NAN));
            }
            if let Some(current) = rows.last_mut() {
                for (cell, &value) in current.iter_mut().zip(row.iter()) {
                    if !value.is_nan() {
                        *cell = value;
                    }
                }
            }
        }

        let mut values = Array2::from_elem((months.len(), self.columns.len()), f64::NAN);
        for (i, row) in rows.into_iter().enumerate() {
            values.row_mut(i).assign(&row);
        }
        Panel {
            index: months,
            columns: self.columns.clone(),
            values,
        }
    }

    fn filter_positions(&self, mut keep: impl FnMut(ArrayView1<'_, f64>) -> bool) -> Self {
        let positions: Vec<usize> = self
            .values
            .rows()
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| keep(row).then_some(i))
            .collect();
        self.take_rows(&positions)
    }

    fn take_rows(&self, positions: &[usize]) -> Self {
        Self {
            index: positions.iter().map(|&i| self.index[i]).collect(),
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), positions),
        }
    }
}

/// Mapping from a panel key to the calendar month it falls in.
pub trait MonthKey {
    /// The month containing this key.
    fn month_key(&self) -> YearMonth;
}

impl MonthKey for Date {
    fn month_key(&self) -> YearMonth {
        YearMonth::from_date(*self)
    }
}

impl MonthKey for YearMonth {
    fn month_key(&self) -> YearMonth {
        *self
    }
}
