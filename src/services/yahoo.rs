//! Yahoo Finance market data provider.
//!
//! Reads OHLCV bars from the v8 chart API. Yahoo has no official API and
//! throttles aggressively, so callers go through [`MarketDataFetcher`] for
//! pacing and retries.
//!
//! [`MarketDataFetcher`]: crate::services::fetcher::MarketDataFetcher

use crate::config::DEFAULT_YAHOO_BASE_URL;
use crate::error::ProviderError;
use crate::models::{Bar, Timeframe};
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooMarketDataProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooMarketDataProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }

    /// Parse a chart payload into bars, skipping rows without a close.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<Vec<Bar>, ProviderError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => {
                return Err(ProviderError::SymbolNotFound(symbol.to_string()))
            }
            (None, Some(err)) => {
                return Err(ProviderError::Malformed(format!(
                    "{}: {}",
                    err.code, err.description
                )))
            }
            (None, None) => return Err(ProviderError::Empty(symbol.to_string())),
        };

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Empty(symbol.to_string()))?;

        let Some(timestamps) = data.timestamp else {
            return Err(ProviderError::Empty(symbol.to_string()));
        };

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let timestamp = DateTime::<Utc>::from_timestamp(ts, 0)
                .ok_or_else(|| ProviderError::Malformed(format!("invalid timestamp: {}", ts)))?;

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten().unwrap_or(close);
            bars.push(Bar::new(
                field(&quote.open),
                field(&quote.high),
                field(&quote.low),
                close,
                quote.volume.get(i).copied().flatten().unwrap_or(0.0),
                timestamp,
            ));
        }

        if bars.is_empty() {
            return Err(ProviderError::Empty(symbol.to_string()));
        }
        Ok(bars)
    }
}

impl Default for YahooMarketDataProvider {
    fn default() -> Self {
        Self::with_client(DEFAULT_YAHOO_BASE_URL, reqwest::Client::new())
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketDataProvider {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, ProviderError> {
        let end = Utc::now();
        let start = end - ChronoDuration::days(timeframe.calendar_days_for(lookback));

        let resp = self
            .client
            .get(self.chart_url(symbol))
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", timeframe.yahoo_interval().to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::SymbolNotFound(symbol.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let chart: ChartResponse = resp.json().await.map_err(|e| {
            ProviderError::Malformed(format!("failed to parse chart for {}: {}", symbol, e))
        })?;

        let mut bars = Self::parse_response(symbol, chart)?;
        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }
        Ok(bars)
    }

    fn name(&self) -> &'static str {
        "yahoo"
    }
}
