//! SMA (Simple Moving Average) indicator

use crate::error::IndicatorError;
use crate::indicators::IndicatorSeries;
use crate::models::PriceSeries;

pub(crate) fn check_window(len: usize, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod(period));
    }
    if len < period {
        return Err(IndicatorError::InsufficientData {
            required: period,
            available: len,
        });
    }
    Ok(())
}

/// SMA over raw closes.
///
/// Each window is summed directly so values stay exact for long series.
pub fn sma_values(closes: &[f64], period: usize) -> Result<IndicatorSeries, IndicatorError> {
    check_window(closes.len(), period)?;

    let values = (0..closes.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &closes[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect();

    Ok(IndicatorSeries::new(period, values))
}

/// Calculate the SMA sequence for a price series
pub fn compute_sma(series: &PriceSeries, period: usize) -> Result<IndicatorSeries, IndicatorError> {
    sma_values(&series.closes(), period)
}
