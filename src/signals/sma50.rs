//! Price above SMA50 on daily, hourly and 15-minute bars.

use crate::indicators::IndicatorSeries;
use crate::models::{round2, PriceSeries, Sma50Signal, BULLISH};

pub const SMA_PERIOD: usize = 50;

pub const SMA50_CONDITION: &str = "Price above SMA50 on Daily + 1HR + 15min";
pub const SMA50_TIMEFRAMES: &str = "daily+1h+15m";

/// One timeframe's input: the bars and, when the series was long enough,
/// its SMA50.
#[derive(Debug, Clone, Copy)]
pub struct TimeframeSma<'a> {
    pub series: &'a PriceSeries,
    pub sma50: Option<&'a IndicatorSeries>,
}

impl<'a> TimeframeSma<'a> {
    pub fn new(series: &'a PriceSeries, sma50: Option<&'a IndicatorSeries>) -> Self {
        Self { series, sma50 }
    }

    /// Latest close and SMA50 at the same bar.
    fn latest(&self) -> Option<(f64, f64)> {
        let sma = self.sma50?;
        let i = self.series.len().checked_sub(1)?;
        if sma.len() != self.series.len() {
            return None;
        }
        Some((self.series.close_at(i)?, sma.get(i)?))
    }
}

pub fn evaluate_sma50_multi_timeframe(
    daily: TimeframeSma<'_>,
    hourly: TimeframeSma<'_>,
    min15: TimeframeSma<'_>,
) -> Option<Sma50Signal> {
    let (daily_price, daily_sma) = daily.latest()?;
    let (hourly_price, hourly_sma) = hourly.latest()?;
    let (min15_price, min15_sma) = min15.latest()?;

    let above = daily_price > daily_sma && hourly_price > hourly_sma && min15_price > min15_sma;
    if !above {
        return None;
    }

    Some(Sma50Signal {
        symbol: daily.series.symbol().to_string(),
        signal: BULLISH.to_string(),
        timeframe: SMA50_TIMEFRAMES.to_string(),
        daily_price: round2(daily_price),
        daily_sma50: round2(daily_sma),
        hourly_price: round2(hourly_price),
        hourly_sma50: round2(hourly_sma),
        min15_price: round2(min15_price),
        min15_sma50: round2(min15_sma),
        condition: SMA50_CONDITION.to_string(),
        matched: true,
    })
}
