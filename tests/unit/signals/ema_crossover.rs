//! Unit tests for the EMA crossover rule

use crate::fixtures::{bars_from_closes, crossover_closes, linear_closes, stale_crossover_closes};
use trendscan::indicators::trend::compute_emas;
use trendscan::models::{PriceSeries, Timeframe, BULLISH};
use trendscan::signals::{evaluate_ema_crossover, EMA_FAST, EMA_MID, EMA_SLOW};

fn evaluate(closes: &[f64], timeframe: Timeframe) -> Option<trendscan::models::EmaCrossoverSignal> {
    let series = PriceSeries::new("NVDA", timeframe, bars_from_closes(closes, timeframe));
    let emas = compute_emas(&series, &[EMA_FAST, EMA_MID, EMA_SLOW]).unwrap();
    evaluate_ema_crossover(&series, &emas[0], &emas[1], &emas[2])
}

#[test]
fn test_fresh_crossover_matches() {
    let signal = evaluate(&crossover_closes(), Timeframe::Daily).expect("fresh crossover");

    assert_eq!(signal.symbol, "NVDA");
    assert_eq!(signal.signal, BULLISH);
    assert_eq!(signal.timeframe, Timeframe::Daily);
    assert_eq!(signal.price, 165.0);
    assert!(signal.matched);
    assert!(signal.ema10 > signal.ema20 && signal.ema20 > signal.ema40);
    assert!(signal.price > signal.ema10);
}

#[test]
fn test_reported_values_rounded_to_cents() {
    let signal = evaluate(&crossover_closes(), Timeframe::Daily).unwrap();
    for value in [signal.ema10, signal.ema20, signal.ema40] {
        assert_eq!((value * 100.0).round() / 100.0, value);
    }
    assert_eq!(signal.ema10, 155.74);
}

#[test]
fn test_crossover_requires_prior_bar_below_ema10() {
    // Close was already above EMA10 on the previous bar.
    assert!(evaluate(&stale_crossover_closes(), Timeframe::Daily).is_none());
}

#[test]
fn test_steady_uptrend_is_not_a_crossover() {
    assert!(evaluate(&linear_closes(100.0, 62), Timeframe::Daily).is_none());
}

#[test]
fn test_close_below_ema10_does_not_match() {
    let mut closes = linear_closes(100.0, 60);
    closes.extend([150.0, 151.0]);
    assert!(evaluate(&closes, Timeframe::Daily).is_none());
}

#[test]
fn test_weekly_crossover_reports_timeframe() {
    let signal = evaluate(&crossover_closes(), Timeframe::Weekly).unwrap();
    assert_eq!(signal.timeframe, Timeframe::Weekly);
}

#[test]
fn test_ema40_undefined_at_previous_bar() {
    // Exactly 40 bars: EMA40 exists only at the last index.
    let series = PriceSeries::new(
        "NVDA",
        Timeframe::Daily,
        bars_from_closes(&linear_closes(100.0, 40), Timeframe::Daily),
    );
    let emas = compute_emas(&series, &[EMA_FAST, EMA_MID, EMA_SLOW]).unwrap();
    assert!(evaluate_ema_crossover(&series, &emas[0], &emas[1], &emas[2]).is_none());
}
