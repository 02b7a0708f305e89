//! Paced, retrying market data fetches.

use crate::config::RetryPolicy;
use crate::error::{DataError, ProviderError};
use crate::metrics::Metrics;
use crate::models::{PriceSeries, Timeframe};
use crate::services::market_data::MarketDataProvider;
use crate::services::rate_limit::RatePacer;
use backon::{ExponentialBuilder, Retryable};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct MarketDataFetcher {
    provider: Arc<dyn MarketDataProvider>,
    pacer: Arc<RatePacer>,
    retry: RetryPolicy,
    metrics: Option<Arc<Metrics>>,
}

impl MarketDataFetcher {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        pacer: Arc<RatePacer>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            pacer,
            retry,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn provider(&self) -> &Arc<dyn MarketDataProvider> {
        &self.provider
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.retry.base_delay)
            .with_max_delay(self.retry.max_delay.max(self.retry.base_delay))
            .with_max_times(self.retry.max_attempts.saturating_sub(1))
            .with_jitter()
    }

    /// Fetch up to `lookback` bars, retrying transient provider errors.
    ///
    /// Every attempt waits on the shared pacer first. Once the retry budget
    /// is spent, or on a non-retryable error, the fetch fails with
    /// [`DataError::NotFound`] when the provider has no bars for the symbol
    /// and [`DataError::Unavailable`] otherwise.
    pub async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: usize,
    ) -> Result<PriceSeries, DataError> {
        let provider = &self.provider;
        let pacer = &self.pacer;
        let metrics = self.metrics.as_deref();
        let attempts = AtomicUsize::new(0);
        let attempts_ref = &attempts;

        let result = (move || async move {
            attempts_ref.fetch_add(1, Ordering::SeqCst);
            pacer.acquire().await;
            if let Some(m) = metrics {
                m.market_data_requests_total
                    .with_label_values(&[timeframe.as_str()])
                    .inc();
            }
            provider.get_bars(symbol, timeframe, lookback).await
        })
        .retry(self.backoff())
        .sleep(tokio::time::sleep)
        .when(ProviderError::is_retryable)
        .notify(|err: &ProviderError, dur: Duration| {
            if let Some(m) = metrics {
                m.market_data_retries_total.inc();
            }
            warn!(
                symbol = %symbol,
                timeframe = %timeframe,
                error = %err,
                retry_in_ms = dur.as_millis() as u64,
                "fetch failed for {} ({}), retrying in {:?}",
                symbol,
                timeframe,
                dur
            );
        })
        .await;

        match result {
            Ok(bars) => {
                let series = PriceSeries::new(symbol, timeframe, bars).keep_last(lookback);
                debug!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    bars = series.len(),
                    "fetched {} {} bars for {}",
                    series.len(),
                    timeframe,
                    symbol
                );
                Ok(series)
            }
            Err(err) => {
                if let Some(m) = metrics {
                    m.market_data_failures_total
                        .with_label_values(&[timeframe.as_str()])
                        .inc();
                }
                let attempts = attempts.load(Ordering::SeqCst);
                debug!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    attempts = attempts,
                    error = %err,
                    "giving up on {} ({}) after {} attempts",
                    symbol,
                    timeframe,
                    attempts
                );
                Err(DataError::from_provider(symbol, timeframe, &err))
            }
        }
    }
}
