//! Scan runtime wiring

use crate::analysis::Analyzer;
use crate::config::{Config, ScanSettings};
use crate::core::scheduler::ScanScheduler;
use crate::error::ProviderError;
use crate::jobs::context::ScanContext;
use crate::jobs::store::JobStore;
use crate::metrics::Metrics;
use crate::services::fetcher::MarketDataFetcher;
use crate::services::market_data::MarketDataProvider;
use crate::services::rate_limit::RatePacer;
use crate::services::universe::{FileSymbolUniverse, SymbolUniverse};
use crate::services::yahoo::YahooMarketDataProvider;
use crate::signals::engine::SignalEngine;
use std::sync::Arc;
use tracing::info;

/// Everything a front end (HTTP or CLI) needs to run and query scans.
///
/// One pacer and one fetcher are shared by every job and by the analyzer,
/// so the provider sees a single request budget.
pub struct ScanRuntime {
    pub scheduler: ScanScheduler,
    pub store: Arc<JobStore>,
    pub analyzer: Arc<Analyzer>,
    pub universe: Arc<dyn SymbolUniverse>,
    pub metrics: Option<Arc<Metrics>>,
}

impl ScanRuntime {
    pub fn new(
        settings: &ScanSettings,
        provider: Arc<dyn MarketDataProvider>,
        universe: Arc<dyn SymbolUniverse>,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        let pacer = Arc::new(RatePacer::new(settings.requests_per_second));
        let mut fetcher = MarketDataFetcher::new(provider.clone(), pacer, settings.retry.clone());
        if let Some(ref m) = metrics {
            fetcher = fetcher.with_metrics(m.clone());
        }
        let fetcher = Arc::new(fetcher);

        let store = Arc::new(JobStore::new(settings.max_retained_jobs));
        let engine = Arc::new(SignalEngine::new(fetcher.clone()));
        let ctx = Arc::new(ScanContext::new(
            engine,
            universe.clone(),
            store.clone(),
            metrics.clone(),
            settings.workers,
        ));

        info!(
            provider = provider.name(),
            workers = settings.workers,
            requests_per_second = settings.requests_per_second,
            max_attempts = settings.retry.max_attempts,
            "ScanRuntime: initialized"
        );

        Self {
            scheduler: ScanScheduler::new(ctx),
            store,
            analyzer: Arc::new(Analyzer::new(fetcher)),
            universe,
            metrics,
        }
    }

    /// Yahoo Finance provider with the file-backed universe.
    pub fn from_config(
        config: &Config,
        metrics: Option<Arc<Metrics>>,
    ) -> Result<Self, ProviderError> {
        let provider = Arc::new(YahooMarketDataProvider::new(config.yahoo_base_url.clone())?);
        let universe = Arc::new(FileSymbolUniverse::new(config.symbols_file.clone()));
        info!(
            symbols_file = %config.symbols_file.display(),
            base_url = %config.yahoo_base_url,
            "ScanRuntime: using Yahoo Finance provider"
        );
        Ok(Self::new(&config.scan, provider, universe, metrics))
    }
}
