//! Unit tests for SMA indicator

use crate::fixtures::{bars_from_closes, linear_closes};
use trendscan::indicators::trend::{compute_sma, sma_values};
use trendscan::models::{PriceSeries, Timeframe};
use trendscan::IndicatorError;

#[test]
fn test_sma_golden_vector() {
    let closes = [9.0, 9.5, 10.0, 10.2, 9.8, 10.5, 11.0, 11.3, 11.8, 12.1];
    let expected = [9.5, 9.9, 10.0, 10.1667, 10.4333, 10.9333, 11.3667, 11.7333];

    let sma = sma_values(&closes, 3).unwrap();
    assert_eq!(sma.len(), closes.len());
    assert_eq!(sma.get(0), None);
    assert_eq!(sma.get(1), None);

    for (i, want) in expected.iter().enumerate() {
        let got = sma.get(i + 2).unwrap();
        assert!(
            (got - want).abs() < 1e-3,
            "index {}: expected {}, got {}",
            i + 2,
            want,
            got
        );
    }
}

#[test]
fn test_sma_period_one_is_identity() {
    let closes = [3.0, 1.5, 7.25];
    let sma = sma_values(&closes, 1).unwrap();
    let values: Vec<f64> = sma.values().iter().map(|v| v.unwrap()).collect();
    assert_eq!(values, closes.to_vec());
}

#[test]
fn test_sma_long_series_stays_exact() {
    let closes = vec![0.1; 5_000];
    let sma = sma_values(&closes, 50).unwrap();
    assert!((sma.latest().unwrap() - 0.1).abs() < 1e-12);
}

#[test]
fn test_sma_insufficient_data() {
    let closes = linear_closes(10.0, 49);
    assert_eq!(
        sma_values(&closes, 50).unwrap_err(),
        IndicatorError::InsufficientData {
            required: 50,
            available: 49
        }
    );
}

#[test]
fn test_sma_zero_period_rejected() {
    assert_eq!(
        sma_values(&[1.0], 0).unwrap_err(),
        IndicatorError::InvalidPeriod(0)
    );
}

#[test]
fn test_compute_sma_over_price_series() {
    let series = PriceSeries::new(
        "MSFT",
        Timeframe::Hourly,
        bars_from_closes(&linear_closes(1.0, 60), Timeframe::Hourly),
    );
    let sma = compute_sma(&series, 50).unwrap();
    assert_eq!(sma.period(), 50);
    assert_eq!(sma.warmup(), 49);
    // Mean of 11..=60.
    assert!((sma.latest().unwrap() - 35.5).abs() < 1e-9);
}
