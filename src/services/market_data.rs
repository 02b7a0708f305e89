//! Market data provider interface and an in-memory implementation.

use crate::error::ProviderError;
use crate::models::{Bar, Timeframe};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Get up to `lookback` of the most recent bars for a symbol.
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Provider backed by preloaded bars.
///
/// Used by tests and offline runs. Failures can be injected per symbol:
/// permanent (every request fails with a 503) or transient (the first `n`
/// requests fail, later ones succeed).
#[derive(Default)]
pub struct InMemoryMarketDataProvider {
    bars: HashMap<(String, Timeframe), Vec<Bar>>,
    failing: HashSet<String>,
    flaky: Mutex<HashMap<String, usize>>,
    latency: Option<Duration>,
    requests: AtomicUsize,
}

impl InMemoryMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: &str, timeframe: Timeframe, bars: Vec<Bar>) -> Self {
        self.bars.insert((symbol.to_uppercase(), timeframe), bars);
        self
    }

    pub fn with_failure(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_uppercase());
        self
    }

    pub fn with_transient_failures(self, symbol: &str, failures: usize) -> Self {
        if let Ok(mut flaky) = self.flaky.lock() {
            flaky.insert(symbol.to_uppercase(), failures);
        }
        self
    }

    /// Delay every request, simulating a slow upstream.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn take_transient_failure(&self, symbol: &str) -> bool {
        let Ok(mut flaky) = self.flaky.lock() else {
            return false;
        };
        match flaky.get_mut(symbol) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<Vec<Bar>, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let symbol = symbol.to_uppercase();
        if self.failing.contains(&symbol) || self.take_transient_failure(&symbol) {
            return Err(ProviderError::Status {
                status: 503,
                message: format!("upstream unavailable for {}", symbol),
            });
        }

        let bars = self
            .bars
            .get(&(symbol.clone(), timeframe))
            .ok_or_else(|| ProviderError::SymbolNotFound(symbol.clone()))?;

        let start = bars.len().saturating_sub(lookback);
        Ok(bars[start..].to_vec())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
