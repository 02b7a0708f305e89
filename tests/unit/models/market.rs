//! Unit tests for bars, timeframes and series normalisation

use crate::fixtures::base_time;
use chrono::Duration;
use trendscan::models::{Bar, PriceSeries, Timeframe};

fn bar(close: f64, minutes: i64) -> Bar {
    Bar::new(close, close, close, close, 100.0, base_time() + Duration::minutes(minutes))
}

#[test]
fn test_series_sorts_by_timestamp() {
    let series = PriceSeries::new(
        "AAPL",
        Timeframe::FifteenMinute,
        vec![bar(3.0, 30), bar(1.0, 0), bar(2.0, 15)],
    );
    assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_series_duplicate_timestamp_keeps_later_sample() {
    let series = PriceSeries::new(
        "AAPL",
        Timeframe::FifteenMinute,
        vec![bar(1.0, 0), bar(2.0, 15), bar(2.5, 15), bar(3.0, 30)],
    );
    assert_eq!(series.len(), 3);
    assert_eq!(series.close_at(1), Some(2.5));

    let timestamps: Vec<_> = series.bars().iter().map(|b| b.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_series_drops_non_finite_closes() {
    let series = PriceSeries::new(
        "AAPL",
        Timeframe::Daily,
        vec![bar(1.0, 0), bar(f64::NAN, 1), bar(2.0, 2)],
    );
    assert_eq!(series.closes(), vec![1.0, 2.0]);
}

#[test]
fn test_keep_last() {
    let bars = (0..10).map(|i| bar(i as f64, i)).collect();
    let series = PriceSeries::new("AAPL", Timeframe::Daily, bars).keep_last(4);
    assert_eq!(series.closes(), vec![6.0, 7.0, 8.0, 9.0]);
    assert_eq!(series.symbol(), "AAPL");
    assert_eq!(series.timeframe(), Timeframe::Daily);
}

#[test]
fn test_timeframe_names() {
    assert_eq!(Timeframe::FifteenMinute.as_str(), "15m");
    assert_eq!(Timeframe::Weekly.yahoo_interval(), "1wk");
    assert_eq!(
        serde_json::to_value(Timeframe::Hourly).unwrap(),
        serde_json::json!("hourly")
    );
}

#[test]
fn test_calendar_window_covers_lookback() {
    assert!(Timeframe::Daily.calendar_days_for(120) >= 168);
    assert!(Timeframe::Weekly.calendar_days_for(120) >= 840);
    assert!(Timeframe::FifteenMinute.calendar_days_for(100) >= 7);
}
