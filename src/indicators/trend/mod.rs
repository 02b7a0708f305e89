//! Trend indicators: EMA, SMA

pub mod ema;
pub mod sma;

pub use ema::*;
pub use sma::{compute_sma, sma_values};
