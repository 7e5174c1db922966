//! Conversions between panels and Polars data frames.

use polars::prelude::*;

use crate::{
    Date, InstrumentId, Result, TsmomError, YearMonth,
    panel::{Panel, PanelKey},
};

/// Days from 0001-01-01 (CE) to 1970-01-01, the Polars date epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Panel keys that can be written as a Polars index column.
pub trait FrameKey: PanelKey {
    /// Name of the index column.
    const INDEX_COLUMN: &'static str;

    /// Index column for `keys`.
    fn index_series(keys: &[Self]) -> Series;
}

impl FrameKey for Date {
    const INDEX_COLUMN: &'static str = "date";

    fn index_series(keys: &[Self]) -> Series {
        Series::new(Self::INDEX_COLUMN.into(), keys.to_vec())
    }
}

impl FrameKey for YearMonth {
    const INDEX_COLUMN: &'static str = "month";

    /// Months are written as their day-28 anchor dates.
    fn index_series(keys: &[Self]) -> Series {
        let anchors: Vec<Option<Date>> = keys.iter().map(|k| k.anchor()).collect();
        Series::new(Self::INDEX_COLUMN.into(), anchors)
    }
}

impl<K: FrameKey> Panel<K> {
    /// Wide data frame: the index column followed by one `f64` column per
    /// instrument. Undefined cells become nulls.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns().len() + 1);
        columns.push(K::index_series(self.index()).into());

        for (j, id) in self.columns().iter().enumerate() {
            let values: Vec<Option<f64>> = self
                .values()
                .column(j)
                .iter()
                .map(|&v| (!v.is_nan()).then_some(v))
                .collect();
            columns.push(Series::new(id.as_str().into(), values).into());
        }

        Ok(DataFrame::new(columns)?)
    }
}

impl Panel<Date> {
    /// Pivot a long frame of `(date, instrument, value)` rows into a daily
    /// panel.
    ///
    /// The date column may be a Polars `Date` or an ISO `YYYY-MM-DD` string.
    /// Rows with a null value leave their cell undefined.
    ///
    /// # Errors
    ///
    /// Returns [`TsmomError::MissingColumn`] for an absent column and
    /// [`TsmomError::MalformedInput`] for null keys, unparseable dates or
    /// duplicate `(date, instrument)` pairs.
    pub fn from_long_frame(
        df: &DataFrame,
        date_col: &str,
        id_col: &str,
        value_col: &str,
    ) -> Result<Self> {
        for name in [date_col, id_col, value_col] {
            if df.column(name).is_err() {
                return Err(TsmomError::MissingColumn(name.to_string()));
            }
        }

        let dates = frame_dates(df.column(date_col)?.as_materialized_series())?;
        let id_series = df.column(id_col)?.as_materialized_series();
        let ids = id_series.str()?;
        let values = df
            .column(value_col)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let values = values.f64()?;

        let mut observations = Vec::with_capacity(df.height());
        for (row, ((date, id), value)) in dates
            .into_iter()
            .zip(ids.into_iter())
            .zip(values.into_iter())
            .enumerate()
        {
            let (Some(date), Some(id)) = (date, id) else {
                return Err(TsmomError::MalformedInput(format!(
                    "row {row}: null date or instrument"
                )));
            };
            if let Some(value) = value {
                observations.push((date, InstrumentId::from(id), value));
            }
        }

        Self::from_long(observations)
    }
}

fn frame_dates(series: &Series) -> Result<Vec<Option<Date>>> {
    match series.dtype() {
        DataType::Date => series
            .date()?
            .into_iter()
            .map(|d: Option<i32>| {
                d.map(|days| {
                    Date::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE).ok_or_else(
                        || TsmomError::MalformedInput(format!("date out of range: {days}")),
                    )
                })
                .transpose()
            })
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|s: Option<&str>| {
                s.map(|s| {
                    Date::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
                        TsmomError::MalformedInput(format!("unparseable date '{s}': {e}"))
                    })
                })
                .transpose()
            })
            .collect(),
        other => Err(TsmomError::MalformedInput(format!(
            "date column has unsupported type {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{DailyPanel, MonthlyPanel};
    use ndarray::array;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_to_frame_daily() {
        let panel = DailyPanel::new(
            vec![date(2020, 1, 1), date(2020, 1, 2)],
            vec!["a".into(), "b".into()],
            array![[1.0, f64::NAN], [2.0, 3.0]],
        )
        .unwrap();

        let df = panel.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(df.column("date").is_ok());
        let b = df.column("b").unwrap().as_materialized_series().f64().unwrap();
        assert_eq!(b.get(0), None);
        assert_eq!(b.get(1), Some(3.0));
    }

    #[test]
    fn test_frame_display_renders_cells() {
        let panel = DailyPanel::new(
            vec![date(2020, 1, 1), date(2020, 1, 2)],
            vec!["spx".into()],
            array![[f64::NAN], [1.25]],
        )
        .unwrap();

        let text = panel.to_frame().unwrap().tail(Some(6)).to_string();
        assert!(text.contains("spx"), "{text}");
        assert!(text.contains("2020-01-02"), "{text}");
        assert!(text.contains("1.25"), "{text}");
        assert!(text.contains("null"), "{text}");
    }

    #[test]
    fn test_to_frame_monthly_uses_month_column() {
        let months = vec![YearMonth::new(2020, 1).unwrap(), YearMonth::new(2020, 2).unwrap()];
        let panel = MonthlyPanel::new(months, vec!["a".into()], array![[1.0], [2.0]]).unwrap();
        let df = panel.to_frame().unwrap();
        assert!(df.column("month").is_ok());
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_from_long_frame_string_dates() {
        let df = df! {
            "DATE_" => &["2020-01-02", "2020-01-01", "2020-01-01"],
            "TICKER" => &["a", "a", "b"],
            "PRICE" => &[2.0, 1.0, 5.0],
        }
        .unwrap();

        let panel = DailyPanel::from_long_frame(&df, "DATE_", "TICKER", "PRICE").unwrap();
        assert_eq!(panel.index(), &[date(2020, 1, 1), date(2020, 1, 2)]);
        assert_eq!(panel.get(&date(2020, 1, 2), &"a".into()), Some(2.0));
        assert_eq!(panel.get(&date(2020, 1, 2), &"b".into()), None);
    }

    #[test]
    fn test_from_long_frame_missing_column() {
        let df = df! {
            "DATE_" => &["2020-01-01"],
            "PRICE" => &[1.0],
        }
        .unwrap();
        let result = DailyPanel::from_long_frame(&df, "DATE_", "TICKER", "PRICE");
        assert!(matches!(result, Err(TsmomError::MissingColumn(_))));
    }

    #[test]
    fn test_from_long_frame_bad_date() {
        let df = df! {
            "DATE_" => &["not-a-date"],
            "TICKER" => &["a"],
            "PRICE" => &[1.0],
        }
        .unwrap();
        let result = DailyPanel::from_long_frame(&df, "DATE_", "TICKER", "PRICE");
        assert!(matches!(result, Err(TsmomError::MalformedInput(_))));
    }
}
