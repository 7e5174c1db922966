//! Excess returns over the reference short rate and their compounding.

use ndarray::{Array2, Axis};
use tracing::debug;
use tsmom_traits::{
    DailyPanel, ExcessReturns, MonthlyPanel, Panel, PriceTable, Result, TsmomError, Universe,
};

/// Daily simple returns of the universe in excess of the reference rate.
///
/// `excess(d, i) = p(d, i) / p(d-1, i) - 1 - (rate(d) - rate(d-1)) / 100`
///
/// Dates on which any universe price or the rate is undefined are dropped
/// before differencing, so `d-1` is the previous complete date and a return
/// spans the gap. The first complete date has no predecessor and is dropped.
/// Universe instruments absent from `prices` are excluded with a warning.
///
/// # Errors
///
/// Returns [`TsmomError::MissingData`] if the reference-rate column or every
/// universe instrument is absent.
pub fn excess_returns(prices: &PriceTable, universe: &Universe) -> Result<ExcessReturns> {
    let rate_id = universe.reference_rate();
    if prices.column_position(rate_id).is_none() {
        return Err(TsmomError::MissingData(format!(
            "reference rate '{rate_id}' not found in prices"
        )));
    }

    let (levels, missing) = prices.select_columns(universe.instruments());
    if levels.columns().is_empty() {
        return Err(TsmomError::MissingData(format!(
            "none of the universe instruments are present (missing: {missing:?})"
        )));
    }

    let width = levels.columns().len();
    let mut ids = levels.columns().to_vec();
    ids.push(rate_id.clone());
    let (complete, _) = prices.select_columns(&ids);
    let complete = complete.drop_incomplete_rows();

    let n = complete.len();
    if n < 2 {
        return Ok(Panel::empty(levels.columns().to_vec()));
    }

    let p = complete.values();
    let mut raw = Array2::from_elem((n - 1, width), f64::NAN);
    for t in 1..n {
        let rate_change = (p[[t, width]] - p[[t - 1, width]]) / 100.0;
        for j in 0..width {
            raw[[t - 1, j]] = p[[t, j]] / p[[t - 1, j]] - 1.0 - rate_change;
        }
    }

    let excess = Panel::new(complete.index()[1..].to_vec(), levels.columns().to_vec(), raw)?
        .drop_incomplete_rows();
    debug!(
        dates = prices.len(),
        complete = n,
        kept = excess.len(),
        "computed daily excess returns"
    );
    Ok(excess)
}

/// Running product of `1 + r` per instrument, seeded at one before the first
/// observation.
pub fn cumulative(returns: &DailyPanel) -> Result<DailyPanel> {
    let mut growth = returns.values().mapv(|r| 1.0 + r);
    growth.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr *= prev);
    returns.with_values(growth)
}

/// Month-end cumulative excess returns: [`excess_returns`], compounded with
/// [`cumulative`], keeping the last value of each calendar month.
pub fn monthly_cumulative(prices: &PriceTable, universe: &Universe) -> Result<MonthlyPanel> {
    let excess = excess_returns(prices, universe)?;
    let monthly = cumulative(&excess)?.month_end();
    debug!(months = monthly.len(), "resampled cumulative excess returns to month end");
    Ok(monthly)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use tsmom_traits::{Date, InstrumentId, YearMonth};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn universe() -> Universe {
        Universe::new(vec!["eq".into(), "bond".into()], "rate".into()).unwrap()
    }

    fn prices() -> PriceTable {
        PriceTable::new(
            vec![date(2020, 1, 1), date(2020, 1, 2), date(2020, 1, 3)],
            vec!["bond".into(), "eq".into(), "rate".into()],
            array![[100.0, 50.0, 1.00], [101.0, 55.0, 1.10], [101.0, 44.0, 1.10]],
        )
        .unwrap()
    }

    #[test]
    fn test_excess_returns_subtract_rate_change() {
        let excess = excess_returns(&prices(), &universe()).unwrap();

        // first date dropped, universe order kept
        assert_eq!(excess.index(), &[date(2020, 1, 2), date(2020, 1, 3)]);
        let ids: Vec<InstrumentId> = vec!["eq".into(), "bond".into()];
        assert_eq!(excess.columns(), ids.as_slice());

        let d2 = date(2020, 1, 2);
        assert_relative_eq!(excess.get(&d2, &"eq".into()).unwrap(), 0.1 - 0.001, epsilon = 1e-12);
        assert_relative_eq!(excess.get(&d2, &"bond".into()).unwrap(), 0.01 - 0.001, epsilon = 1e-12);

        let d3 = date(2020, 1, 3);
        assert_relative_eq!(excess.get(&d3, &"eq".into()).unwrap(), -0.2, epsilon = 1e-12);
        assert_relative_eq!(excess.get(&d3, &"bond".into()).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_excess_returns_span_price_holes() {
        let prices = PriceTable::new(
            vec![date(2020, 1, 1), date(2020, 1, 2), date(2020, 1, 3), date(2020, 1, 6)],
            vec!["bond".into(), "eq".into(), "rate".into()],
            array![
                [100.0, 50.0, 1.0],
                [100.0, 50.0, 1.0],
                [110.0, f64::NAN, 1.0],
                [121.0, 55.0, 1.0]
            ],
        )
        .unwrap();

        let excess = excess_returns(&prices, &universe()).unwrap();
        // 01-03 is incomplete, so the 01-06 return is measured from 01-02
        assert_eq!(excess.index(), &[date(2020, 1, 2), date(2020, 1, 6)]);
        let d6 = date(2020, 1, 6);
        assert_relative_eq!(excess.get(&d6, &"bond".into()).unwrap(), 0.21, epsilon = 1e-12);
        assert_relative_eq!(excess.get(&d6, &"eq".into()).unwrap(), 0.1, epsilon = 1e-12);

        // compounding still reproduces the full price ratio
        let cum = cumulative(&excess).unwrap();
        assert_relative_eq!(cum.get(&d6, &"bond".into()).unwrap(), 1.21, epsilon = 1e-12);
    }

    #[test]
    fn test_rate_hole_drops_the_date() {
        let prices = PriceTable::new(
            vec![date(2020, 1, 1), date(2020, 1, 2), date(2020, 1, 3)],
            vec!["bond".into(), "eq".into(), "rate".into()],
            array![[100.0, 50.0, 1.0], [101.0, 51.0, f64::NAN], [102.0, 52.0, 1.5]],
        )
        .unwrap();

        let excess = excess_returns(&prices, &universe()).unwrap();
        assert_eq!(excess.index(), &[date(2020, 1, 3)]);
        assert_relative_eq!(
            excess.get(&date(2020, 1, 3), &"bond".into()).unwrap(),
            0.02 - 0.005,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_missing_reference_rate() {
        let prices = PriceTable::new(
            vec![date(2020, 1, 1)],
            vec!["eq".into()],
            array![[1.0]],
        )
        .unwrap();
        let result = excess_returns(&prices, &universe());
        assert!(matches!(result, Err(TsmomError::MissingData(_))));
    }

    #[test]
    fn test_missing_instrument_is_excluded() {
        let prices = PriceTable::new(
            vec![date(2020, 1, 1), date(2020, 1, 2)],
            vec!["eq".into(), "rate".into()],
            array![[1.0, 1.0], [1.1, 1.0]],
        )
        .unwrap();
        let excess = excess_returns(&prices, &universe()).unwrap();
        assert_eq!(excess.columns(), &[InstrumentId::from("eq")]);
        assert_eq!(excess.len(), 1);
    }

    #[test]
    fn test_single_date_gives_empty_returns() {
        let prices = PriceTable::new(
            vec![date(2020, 1, 1)],
            vec!["eq".into(), "rate".into()],
            array![[1.0, 1.0]],
        )
        .unwrap();
        let excess = excess_returns(&prices, &universe()).unwrap();
        assert!(excess.is_empty());
    }

    #[test]
    fn test_cumulative_constant_return_compounds() {
        let r = 0.01;
        let n = 24;
        let dates: Vec<Date> = (0..n).map(|i| date(2020, 1, 1) + chrono::Days::new(i)).collect();
        let returns = DailyPanel::new(
            dates.clone(),
            vec!["eq".into()],
            Array2::from_elem((n as usize, 1), r),
        )
        .unwrap();

        let cum = cumulative(&returns).unwrap();
        for (k, d) in dates.iter().enumerate() {
            let expected = (1.0 + r).powi(k as i32 + 1);
            assert_relative_eq!(cum.get(d, &"eq".into()).unwrap(), expected, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_monthly_cumulative_takes_month_end() {
        let prices = PriceTable::new(
            vec![date(2020, 1, 30), date(2020, 1, 31), date(2020, 2, 3), date(2020, 2, 4)],
            vec!["bond".into(), "eq".into(), "rate".into()],
            array![
                [100.0, 100.0, 1.0],
                [110.0, 100.0, 1.0],
                [121.0, 100.0, 1.0],
                [121.0, 90.0, 1.0]
            ],
        )
        .unwrap();

        let monthly = monthly_cumulative(&prices, &universe()).unwrap();
        let jan = YearMonth::new(2020, 1).unwrap();
        let feb = YearMonth::new(2020, 2).unwrap();
        assert_eq!(monthly.index(), &[jan, feb]);
        assert_relative_eq!(monthly.get(&jan, &"bond".into()).unwrap(), 1.1, epsilon = 1e-12);
        assert_relative_eq!(monthly.get(&feb, &"bond".into()).unwrap(), 1.21, epsilon = 1e-12);
        assert_relative_eq!(monthly.get(&feb, &"eq".into()).unwrap(), 0.9, epsilon = 1e-12);
    }
}
