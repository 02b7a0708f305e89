//! Symbol-level evaluation: fetch, compute indicators, apply the scan rule.

use crate::error::{IndicatorError, SymbolError};
use crate::indicators::{compute_emas, compute_sma};
use crate::models::{
    EmaCrossoverSignal, PriceSeries, ScanType, SignalResult, Sma50Signal, Timeframe,
};
use crate::services::fetcher::MarketDataFetcher;
use crate::signals::ema_crossover::{evaluate_ema_crossover, EMA_FAST, EMA_MID, EMA_SLOW};
use crate::signals::sma50::{evaluate_sma50_multi_timeframe, TimeframeSma, SMA_PERIOD};
use std::sync::Arc;

/// Bars requested for EMA scans (the crossover needs `EMA_SLOW + 1`).
pub const EMA_LOOKBACK: usize = 120;
/// Bars requested per timeframe for the SMA50 scan.
pub const SMA_LOOKBACK: usize = 100;

/// EMA crossover over one series.
pub fn ema_scan(series: &PriceSeries) -> Result<Option<EmaCrossoverSignal>, IndicatorError> {
    if series.len() < EMA_SLOW + 1 {
        return Err(IndicatorError::InsufficientData {
            required: EMA_SLOW + 1,
            available: series.len(),
        });
    }
    let emas = compute_emas(series, &[EMA_FAST, EMA_MID, EMA_SLOW])?;
    Ok(evaluate_ema_crossover(series, &emas[0], &emas[1], &emas[2]))
}

/// SMA50 rule over the three timeframes.
pub fn sma50_scan(
    daily: &PriceSeries,
    hourly: &PriceSeries,
    min15: &PriceSeries,
) -> Result<Option<Sma50Signal>, IndicatorError> {
    let daily_sma = compute_sma(daily, SMA_PERIOD)?;
    let hourly_sma = compute_sma(hourly, SMA_PERIOD)?;
    let min15_sma = compute_sma(min15, SMA_PERIOD)?;

    Ok(evaluate_sma50_multi_timeframe(
        TimeframeSma::new(daily, Some(&daily_sma)),
        TimeframeSma::new(hourly, Some(&hourly_sma)),
        TimeframeSma::new(min15, Some(&min15_sma)),
    ))
}

pub struct SignalEngine {
    fetcher: Arc<MarketDataFetcher>,
}

impl SignalEngine {
    pub fn new(fetcher: Arc<MarketDataFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Arc<MarketDataFetcher> {
        &self.fetcher
    }

    /// Evaluate one symbol for a scan type.
    ///
    /// `Ok(None)` means the symbol was evaluated and did not match.
    pub async fn evaluate(
        &self,
        scan_type: ScanType,
        symbol: &str,
    ) -> Result<Option<SignalResult>, SymbolError> {
        match scan_type {
            ScanType::EmaDaily => self.evaluate_ema(symbol, Timeframe::Daily).await,
            ScanType::EmaWeekly => self.evaluate_ema(symbol, Timeframe::Weekly).await,
            ScanType::Sma50 => self.evaluate_sma50(symbol).await,
        }
    }

    async fn evaluate_ema(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Option<SignalResult>, SymbolError> {
        let series = self
            .fetcher
            .fetch_bars(symbol, timeframe, EMA_LOOKBACK)
            .await?;
        Ok(ema_scan(&series)?.map(SignalResult::from))
    }

    async fn evaluate_sma50(&self, symbol: &str) -> Result<Option<SignalResult>, SymbolError> {
        let (daily, hourly, min15) = tokio::try_join!(
            self.fetcher.fetch_bars(symbol, Timeframe::Daily, SMA_LOOKBACK),
            self.fetcher.fetch_bars(symbol, Timeframe::Hourly, SMA_LOOKBACK),
            self.fetcher
                .fetch_bars(symbol, Timeframe::FifteenMinute, SMA_LOOKBACK),
        )?;
        Ok(sma50_scan(&daily, &hourly, &min15)?.map(SignalResult::from))
    }
}
