//! Unit tests for on-demand symbol analysis

use crate::fixtures::{
    bars_from_closes, fast_retry, linear_closes, with_bullish_symbol, with_flat_symbol,
};
use std::sync::Arc;
use trendscan::analysis::Analyzer;
use trendscan::models::Timeframe;
use trendscan::services::{InMemoryMarketDataProvider, MarketDataFetcher, RatePacer};
use trendscan::ScanError;

fn analyzer(provider: InMemoryMarketDataProvider) -> Analyzer {
    Analyzer::new(Arc::new(MarketDataFetcher::new(
        Arc::new(provider),
        Arc::new(RatePacer::unlimited()),
        fast_retry(),
    )))
}

#[tokio::test]
async fn test_analyze_reports_every_scan() {
    let analyzer = analyzer(with_bullish_symbol(InMemoryMarketDataProvider::new(), "AAPL"));
    let report = analyzer.analyze(" aapl ").await.unwrap();

    assert_eq!(report.symbol, "AAPL");
    assert!(report.ema_daily.is_some());
    assert!(report.ema_weekly.is_some());
    assert!(report.sma50.is_some());
}

#[tokio::test]
async fn test_analyze_without_matches() {
    let analyzer = analyzer(with_flat_symbol(InMemoryMarketDataProvider::new(), "F"));
    let report = analyzer.analyze("F").await.unwrap();

    assert!(report.ema_daily.is_none());
    assert!(report.ema_weekly.is_none());
    assert!(report.sma50.is_none());
}

#[tokio::test]
async fn test_analyze_unknown_symbol() {
    let analyzer = analyzer(InMemoryMarketDataProvider::new());
    assert!(matches!(
        analyzer.analyze("ZZZZ").await,
        Err(ScanError::SymbolNotFound(s)) if s == "ZZZZ"
    ));
}

#[tokio::test]
async fn test_analyze_upstream_outage_is_not_reported_as_unknown() {
    let provider = InMemoryMarketDataProvider::new().with_failure("DOWN");
    match analyzer(provider).analyze("DOWN").await {
        Err(ScanError::MarketDataUnavailable(detail)) => {
            assert!(detail.contains("DOWN"), "detail: {}", detail)
        }
        other => panic!("unexpected outcome: {:?}", other.map(|r| r.symbol)),
    }
}

#[tokio::test]
async fn test_analyze_with_daily_only() {
    let provider = InMemoryMarketDataProvider::new().with_bars(
        "AAPL",
        Timeframe::Daily,
        bars_from_closes(&crate::fixtures::crossover_closes(), Timeframe::Daily),
    );
    let report = analyzer(provider).analyze("AAPL").await.unwrap();

    assert!(report.ema_daily.is_some());
    assert!(report.ema_weekly.is_none());
    assert!(report.sma50.is_none());
}

#[tokio::test]
async fn test_analyze_short_daily_history_is_not_an_error() {
    let provider = InMemoryMarketDataProvider::new().with_bars(
        "NEW",
        Timeframe::Daily,
        bars_from_closes(&linear_closes(10.0, 15), Timeframe::Daily),
    );
    let report = analyzer(provider).analyze("NEW").await.unwrap();
    assert!(report.ema_daily.is_none());
}
