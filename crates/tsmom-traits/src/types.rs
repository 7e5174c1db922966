//! Common types used throughout tsmom.
//!
//! This module defines the keys the engines index by: trading dates, calendar
//! months, instrument identifiers and month-denominated horizons.

use std::{fmt, num::NonZeroU32, str::FromStr};

use chrono::Datelike;
use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Result, TsmomError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Canonical instrument identifier, e.g. `"Equities|SPX"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InstrumentId(String);

impl InstrumentId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for InstrumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A calendar month, the composite key of every monthly table.
///
/// Two dates within the same month map to the same `YearMonth`. Ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    // months elapsed since January of year 0
    ordinal: i32,
}

impl YearMonth {
    /// Day of month used by [`YearMonth::anchor`].
    pub const ANCHOR_DAY: u32 = 28;

    /// Create a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(TsmomError::InvalidParameter(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        if Date::from_ymd_opt(year, month, 1).is_none() {
            return Err(TsmomError::InvalidParameter(format!(
                "year {year} is outside the supported calendar range"
            )));
        }
        Ok(Self {
            ordinal: year * 12 + month as i32 - 1,
        })
    }

    /// The month containing `date`.
    pub fn from_date(date: Date) -> Self {
        Self {
            ordinal: date.year() * 12 + date.month0() as i32,
        }
    }

    /// Calendar year.
    pub const fn year(self) -> i32 {
        self.ordinal.div_euclid(12)
    }

    /// Month number, 1 to 12.
    pub const fn month(self) -> u32 {
        self.ordinal.rem_euclid(12) as u32 + 1
    }

    /// The month `months` calendar months earlier.
    pub fn back(self, months: Months) -> Self {
        let offset = i32::try_from(months.get()).unwrap_or(i32::MAX);
        Self {
            ordinal: self.ordinal.saturating_sub(offset),
        }
    }

    /// Day 28 of this month, the conventional monthly timestamp of the
    /// research tables this key replaces.
    ///
    /// Returns `None` only for months outside chrono's calendar range.
    pub fn anchor(self) -> Option<Date> {
        Date::from_ymd_opt(self.year(), self.month(), Self::ANCHOR_DAY)
    }
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = TsmomError;

    /// Parses `YYYY-MM`, or a full `YYYY-MM-DD` date whose day is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = Date::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }
        let malformed = || TsmomError::MalformedInput(format!("invalid month: '{s}'"));
        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month).map_err(|_| malformed())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A strictly positive number of calendar months.
///
/// Lookback and holding horizons are expressed in this unit; zero is rejected
/// at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[display("{_0}M")]
pub struct Months(NonZeroU32);

impl Months {
    /// One month.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Twelve months.
    pub const TWELVE: Self = Self(NonZeroU32::MIN.saturating_add(11));

    /// Create a horizon of `months` months.
    pub fn new(months: u32) -> Result<Self> {
        NonZeroU32::new(months).map(Self).ok_or_else(|| {
            TsmomError::InvalidParameter("horizon must be at least one month".to_string())
        })
    }

    /// Number of months.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Months {
    type Error = TsmomError;

    fn try_from(months: u32) -> Result<Self> {
        Self::new(months)
    }
}

impl From<Months> for u32 {
    fn from(months: Months) -> Self {
        months.get()
    }
}

/// The tradable instruments and the reference short rate.
///
/// Both engines take the same `Universe`, which keeps the instrument set
/// consistent between momentum and volatility outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    instruments: Vec<InstrumentId>,
    reference_rate: InstrumentId,
}

impl Universe {
    /// Create a universe.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::InvalidParameter`] if the instrument list is empty,
    /// contains duplicates, or contains the reference rate.
    pub fn new(instruments: Vec<InstrumentId>, reference_rate: InstrumentId) -> Result<Self> {
        if instruments.is_empty() {
            return Err(TsmomError::InvalidParameter(
                "universe needs at least one instrument".to_string(),
            ));
        }
        for (i, id) in instruments.iter().enumerate() {
            if instruments[..i].contains(id) {
                return Err(TsmomError::InvalidParameter(format!(
                    "instrument '{id}' listed twice"
                )));
            }
        }
        if instruments.contains(&reference_rate) {
            return Err(TsmomError::InvalidParameter(format!(
                "reference rate '{reference_rate}' cannot also be a tradable instrument"
            )));
        }
        Ok(Self {
            instruments,
            reference_rate,
        })
    }

    /// Tradable instruments in configured order.
    pub fn instruments(&self) -> &[InstrumentId] {
        &self.instruments
    }

    /// Identifier of the short-rate series, quoted in percentage points.
    pub const fn reference_rate(&self) -> &InstrumentId {
        &self.reference_rate
    }

    /// Number of tradable instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Always false for a constructed universe; provided for completeness.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
