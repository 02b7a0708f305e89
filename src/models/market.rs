//! Bars, timeframes and price series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar aggregation interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "hourly")]
    Hourly,
    #[serde(rename = "15m")]
    FifteenMinute,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Hourly => "hourly",
            Timeframe::FifteenMinute => "15m",
        }
    }

    /// Interval parameter understood by the Yahoo chart API.
    pub fn yahoo_interval(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1wk",
            Timeframe::Hourly => "1h",
            Timeframe::FifteenMinute => "15m",
        }
    }

    /// Calendar days of history needed to cover `bars` bars of a US equity
    /// session (6.5 trading hours, 5 sessions a week), with slack for holidays.
    pub fn calendar_days_for(&self, bars: usize) -> i64 {
        let bars = bars as f64;
        let trading_days = match self {
            Timeframe::Daily => bars,
            Timeframe::Weekly => bars * 5.0,
            Timeframe::Hourly => bars / 7.0,
            Timeframe::FifteenMinute => bars / 26.0,
        };
        (trading_days * 7.0 / 5.0).ceil() as i64 + 7
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One OHLCV sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Bar {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// Bars for one (symbol, timeframe), strictly increasing by timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Builds a series from provider output.
    ///
    /// Bars without a finite close are dropped, the rest are sorted by
    /// timestamp and duplicate timestamps collapse to the later sample.
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe, mut bars: Vec<Bar>) -> Self {
        bars.retain(|b| b.close.is_finite());
        bars.sort_by_key(|b| b.timestamp);

        let mut normalized: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match normalized.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => normalized.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            timeframe,
            bars: normalized,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn close_at(&self, index: usize) -> Option<f64> {
        self.bars.get(index).map(|b| b.close)
    }

    /// Keep only the most recent `n` bars.
    pub fn keep_last(mut self, n: usize) -> Self {
        if self.bars.len() > n {
            self.bars.drain(..self.bars.len() - n);
        }
        self
    }
}
