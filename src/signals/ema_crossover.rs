//! Fresh EMA10 crossover with bullish EMA stacking.

use crate::indicators::IndicatorSeries;
use crate::models::{round2, EmaCrossoverSignal, PriceSeries, BULLISH};

pub const EMA_FAST: usize = 10;
pub const EMA_MID: usize = 20;
pub const EMA_SLOW: usize = 40;

pub const CROSSOVER_CONDITION: &str = "Fresh crossover above EMA10 · EMAs stacked bullish";

/// Evaluate the crossover rule at the latest bar `i`, using `i - 1` for the
/// freshness check:
///
/// 1. `close[i] > ema10[i]`
/// 2. `close[i] > ema20[i]`
/// 3. `close[i] > ema40[i]`
/// 4. `close[i-1] < ema10[i-1]`
/// 5. `ema20[i] > ema40[i]`
/// 6. `ema10[i] > ema20[i]`
///
/// Returns `None` unless all six hold with every value at `i` and `i - 1` defined.
pub fn evaluate_ema_crossover(
    series: &PriceSeries,
    ema10: &IndicatorSeries,
    ema20: &IndicatorSeries,
    ema40: &IndicatorSeries,
) -> Option<EmaCrossoverSignal> {
    let len = series.len();
    if len < 2 || [ema10, ema20, ema40].iter().any(|ema| ema.len() != len) {
        return None;
    }

    let i = len - 1;
    let prev = i - 1;

    let close = series.close_at(i)?;
    let prev_close = series.close_at(prev)?;
    let (e10, e20, e40) = (ema10.get(i)?, ema20.get(i)?, ema40.get(i)?);
    let prev_e10 = ema10.get(prev)?;
    ema20.get(prev)?;
    ema40.get(prev)?;

    let conditions = [
        close > e10,
        close > e20,
        close > e40,
        prev_close < prev_e10,
        e20 > e40,
        e10 > e20,
    ];

    if !conditions.iter().all(|&c| c) {
        return None;
    }

    Some(EmaCrossoverSignal {
        symbol: series.symbol().to_string(),
        signal: BULLISH.to_string(),
        timeframe: series.timeframe(),
        price: round2(close),
        ema10: round2(e10),
        ema20: round2(e20),
        ema40: round2(e40),
        condition: CROSSOVER_CONDITION.to_string(),
        matched: true,
    })
}
