//! EMA (Exponential Moving Average) indicator

use super::sma::check_window;
use crate::error::IndicatorError;
use crate::indicators::IndicatorSeries;
use crate::models::PriceSeries;

/// EMA over raw closes.
///
/// Seeded with the SMA of the first `period` closes at index `period - 1`,
/// then `ema[i] = close[i] * k + ema[i - 1] * (1 - k)` with `k = 2 / (period + 1)`.
pub fn ema_values(closes: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    check_window(closes.len(), period)?;

    let k = 2.0 / (period as f64 + 1.0);
    let seed = closes[..period].iter().sum::<f64>() / period as f64;

    let mut values = vec![None; period - 1];
    values.reserve(closes.len() + 1 - period);
    values.push(Some(seed));

    let mut prev = seed;
    for &close in &closes[period..] {
        prev = close * k + prev * (1.0 - k);
        values.push(Some(prev));
    }

    Ok(IndicatorSeries::new(period, values))
}

/// Calculate the EMA sequence for a price series
pub fn compute_ema(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, IndicatorError> {
    ema_values(&series.closes(), period)
}

/// Calculate several EMAs over the same series, failing on the first
/// period the series cannot satisfy.
pub fn compute_emas(
    series: &PriceSeries,
    periods: &[usize],
) -> Result<Vec<IndicatorSeries>, IndicatorError> {
    let closes = series.closes();
    periods
        .iter()
        .map(|&period| ema_values(&closes, period))
        .collect()
}
