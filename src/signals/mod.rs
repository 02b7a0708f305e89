//! Signal rules and symbol-level evaluation.

pub mod ema_crossover;
pub mod engine;
pub mod sma50;

pub use ema_crossover::{evaluate_ema_crossover, EMA_FAST, EMA_MID, EMA_SLOW};
pub use engine::{ema_scan, sma50_scan, SignalEngine, EMA_LOOKBACK, SMA_LOOKBACK};
pub use sma50::{evaluate_sma50_multi_timeframe, TimeframeSma, SMA_PERIOD};
