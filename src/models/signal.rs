use crate::models::Timeframe;
use serde::{Deserialize, Serialize};

pub const BULLISH: &str = "BULLISH";

/// Round to cents for reporting.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmaCrossoverSignal {
    pub symbol: String,
    pub signal: String,
    pub timeframe: Timeframe,
    pub price: f64,
    pub ema10: f64,
    pub ema20: f64,
    pub ema40: f64,
    pub condition: String,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sma50Signal {
    pub symbol: String,
    pub signal: String,
    pub timeframe: String,
    pub daily_price: f64,
    pub daily_sma50: f64,
    pub hourly_price: f64,
    pub hourly_sma50: f64,
    pub min15_price: f64,
    pub min15_sma50: f64,
    pub condition: String,
    pub matched: bool,
}

/// Outcome of evaluating one symbol against one scan rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalResult {
    EmaCrossover(EmaCrossoverSignal),
    Sma50(Sma50Signal),
}

impl SignalResult {
    pub fn symbol(&self) -> &str {
        match self {
            SignalResult::EmaCrossover(s) => &s.symbol,
            SignalResult::Sma50(s) => &s.symbol,
        }
    }

    pub fn matched(&self) -> bool {
        match self {
            SignalResult::EmaCrossover(s) => s.matched,
            SignalResult::Sma50(s) => s.matched,
        }
    }
}

impl From<EmaCrossoverSignal> for SignalResult {
    fn from(signal: EmaCrossoverSignal) -> Self {
        SignalResult::EmaCrossover(signal)
    }
}

impl From<Sma50Signal> for SignalResult {
    fn from(signal: Sma50Signal) -> Self {
        SignalResult::Sma50(signal)
    }
}
