//! On-demand single-symbol analysis outside the job machinery

use crate::error::ScanError;
use crate::models::{EmaCrossoverSignal, Sma50Signal, Timeframe};
use crate::services::fetcher::MarketDataFetcher;
use crate::signals::engine::{ema_scan, sma50_scan, EMA_LOOKBACK, SMA_LOOKBACK};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// All three scans for one symbol. `None` means no match or no data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub ema_daily: Option<EmaCrossoverSignal>,
    pub ema_weekly: Option<EmaCrossoverSignal>,
    pub sma50: Option<Sma50Signal>,
}

pub struct Analyzer {
    fetcher: Arc<MarketDataFetcher>,
}

impl Analyzer {
    pub fn new(fetcher: Arc<MarketDataFetcher>) -> Self {
        Self { fetcher }
    }

    /// Run every scan rule against one symbol.
    ///
    /// The daily series is fetched first and shared by the EMA daily and
    /// SMA50 evaluations. If the provider has no daily bars the symbol is
    /// reported as not found; an upstream outage is reported as such.
    pub async fn analyze(&self, symbol: &str) -> Result<AnalysisReport, ScanError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ScanError::SymbolNotFound(symbol));
        }

        let daily = self
            .fetcher
            .fetch_bars(&symbol, Timeframe::Daily, EMA_LOOKBACK.max(SMA_LOOKBACK))
            .await
            .map_err(|e| {
                debug!(symbol = %symbol, error = %e, "Analyzer: no daily data for {}", symbol);
                if e.is_not_found() {
                    ScanError::SymbolNotFound(symbol.clone())
                } else {
                    ScanError::MarketDataUnavailable(e.to_string())
                }
            })?;
        if daily.is_empty() {
            return Err(ScanError::SymbolNotFound(symbol));
        }

        let (weekly, hourly, min15) = tokio::join!(
            self.fetcher
                .fetch_bars(&symbol, Timeframe::Weekly, EMA_LOOKBACK),
            self.fetcher
                .fetch_bars(&symbol, Timeframe::Hourly, SMA_LOOKBACK),
            self.fetcher
                .fetch_bars(&symbol, Timeframe::FifteenMinute, SMA_LOOKBACK),
        );

        let ema_daily = ema_scan(&daily).ok().flatten();
        let ema_weekly = match weekly {
            Ok(series) => ema_scan(&series).ok().flatten(),
            Err(e) => {
                debug!(symbol = %symbol, error = %e, "Analyzer: weekly leg unavailable");
                None
            }
        };
        let sma50 = match (hourly, min15) {
            (Ok(hourly), Ok(min15)) => sma50_scan(&daily, &hourly, &min15).ok().flatten(),
            (Err(e), _) | (_, Err(e)) => {
                debug!(symbol = %symbol, error = %e, "Analyzer: intraday leg unavailable");
                None
            }
        };

        info!(
            symbol = %symbol,
            ema_daily = ema_daily.is_some(),
            ema_weekly = ema_weekly.is_some(),
            sma50 = sma50.is_some(),
            "Analyzer: analyzed {}",
            symbol
        );

        Ok(AnalysisReport {
            symbol,
            timestamp: Utc::now(),
            ema_daily,
            ema_weekly,
            sma50,
        })
    }
}
