//! trendscan: moving-average scan engine for equity universes.
//!
//! Fetches bar history per symbol, computes EMA/SMA series, evaluates the
//! EMA crossover and SMA50 multi-timeframe setups, and tracks long-running
//! scan jobs for polling clients.

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{DataError, IndicatorError, ProviderError, ScanError, SymbolError, UniverseError};
